//! Error taxonomy for the stealth core.
//!
//! Input-validation and curve errors fail fast before any cryptographic
//! operation. Scanning non-matches are deliberately *not* represented here:
//! an announcement that does not decrypt for the caller is the expected
//! common case and is skipped silently by the scan engine.
//!
//! No variant ever carries private key material.

use thiserror::Error;

/// Maximum plausible transfer amount in satoshis (21 million BTC).
pub const MAX_AMOUNT_SATS: u64 = 2_100_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StealthError {
    /// Wallet signature input was not exactly 64 bytes.
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// A byte string had the wrong length for the type being parsed.
    #[error("invalid input length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// A parsed or recovered point does not satisfy the curve equation,
    /// or its x coordinate is not a canonical field element.
    #[error("point is not on the curve")]
    InvalidPoint,

    /// Compressed point carried a prefix byte other than 0x02/0x03.
    #[error("invalid compressed point prefix: {0:#04x}")]
    InvalidPointPrefix(u8),

    /// Modular inverse requested for zero. Indicates a caller bug or
    /// corrupted input, never a recoverable user error.
    #[error("modular inverse of zero")]
    InverseOfZero,

    /// ECDH produced the point at infinity. Astronomically unlikely with
    /// honest inputs, but checked on every key agreement.
    #[error("ECDH key agreement produced the point at infinity")]
    EcdhFailure,

    /// The derived stealth private key does not match the scanned note's
    /// stealth public key. The note belongs to a different key pair or the
    /// announcement was tampered with; claiming must not proceed.
    #[error("derived stealth key does not match scanned note")]
    StealthKeyMismatch,

    /// Announcement buffer carried an unknown discriminator byte.
    #[error("unknown announcement discriminator: {0:#04x}")]
    InvalidDiscriminator(u8),

    /// Announcement timestamp was negative or otherwise out of range.
    #[error("announcement timestamp out of range")]
    InvalidTimestamp,

    /// Amount outside the plausible satoshi range (0, 21M BTC].
    #[error("amount {0} outside valid satoshi range")]
    AmountOutOfRange(u64),

    /// Split amounts must be non-zero and strictly less than the total.
    #[error("invalid split: parts must be non-zero and sum to the total")]
    InvalidSplit,

    /// Hex decoding failed while parsing a display encoding.
    #[error("invalid hex encoding")]
    InvalidHex,
}

impl From<hex::FromHexError> for StealthError {
    fn from(_: hex::FromHexError) -> Self {
        StealthError::InvalidHex
    }
}

pub type Result<T> = std::result::Result<T, StealthError>;
