//! Sender-side stealth deposit construction (DKSAP, EIP-5564 style).
//!
//! For each deposit the sender draws a fresh ephemeral scalar `r` and runs
//! one Diffie-Hellman against the recipient's *viewing* key:
//!
//! ```text
//! R  = r·G                          (published)
//! S  = r·V                          (shared secret, V = viewing pub)
//! k  = SHA256(compress(S) ‖ "zvault_stealth_v1") mod N
//! P' = P + k·G                      (one-time stealth key, P = spending pub)
//! ```
//!
//! The announcement carries `R`, the XOR-encrypted amount, and a Poseidon
//! commitment over `(P'.x, amount)`. Nothing in it links back to the
//! recipient's meta-address without the viewing secret.
//!
//! Ephemeral scalars must never be reused across deposits; `create_deposit`
//! draws from OS entropy each call.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::amount::{encrypt_amount, ENCRYPTED_AMOUNT_SIZE};
use crate::curve::{AffinePoint, COMPRESSED_POINT_SIZE};
use crate::encoding::hex_array;
use crate::error::{Result, StealthError, MAX_AMOUNT_SATS};
use crate::field::Scalar;
use crate::keys::StealthMetaAddress;
use crate::poseidon;

/// Domain string for the stealth tweak KDF.
pub const STEALTH_KDF_DOMAIN: &[u8] = b"zvault_stealth_v1";

/// Everything the sender hands to the chain for one transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthDeposit {
    #[serde(with = "hex_array")]
    pub ephemeral_pub: [u8; COMPRESSED_POINT_SIZE],
    #[serde(with = "hex_array")]
    pub encrypted_amount: [u8; ENCRYPTED_AMOUNT_SIZE],
    #[serde(with = "hex_array")]
    pub commitment: [u8; 32],
    pub created_at: i64,
}

/// Derive the additive stealth tweak `k` from a shared secret point.
pub(crate) fn stealth_tweak(shared_secret: &AffinePoint) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret.compress());
    hasher.update(STEALTH_KDF_DOMAIN);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Scalar::from_bytes_be(&bytes)
}

/// Create a deposit to `recipient` with a fresh random ephemeral key.
pub fn create_deposit(
    recipient: &StealthMetaAddress,
    amount_sats: u64,
) -> Result<StealthDeposit> {
    let ephemeral = Scalar::random(&mut OsRng);
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    create_deposit_with_ephemeral(recipient, amount_sats, &ephemeral, created_at)
}

/// Deterministic variant taking the ephemeral scalar and timestamp
/// explicitly. The caller owns ephemeral uniqueness.
pub fn create_deposit_with_ephemeral(
    recipient: &StealthMetaAddress,
    amount_sats: u64,
    ephemeral: &Scalar,
    created_at: i64,
) -> Result<StealthDeposit> {
    if amount_sats == 0 || amount_sats > MAX_AMOUNT_SATS {
        return Err(StealthError::AmountOutOfRange(amount_sats));
    }

    let generator = AffinePoint::generator();
    let ephemeral_pub = generator.mul(ephemeral);

    let shared_secret = recipient.viewing_pub.mul(ephemeral);
    if shared_secret.is_infinity() {
        return Err(StealthError::EcdhFailure);
    }

    let tweak = stealth_tweak(&shared_secret);
    let stealth_pub = recipient.spending_pub.add(&generator.mul(&tweak));

    Ok(StealthDeposit {
        ephemeral_pub: ephemeral_pub.compress(),
        encrypted_amount: encrypt_amount(amount_sats, &shared_secret),
        commitment: poseidon::commitment(&stealth_pub.x, amount_sats),
        created_at,
    })
}

/// Split a total into two independent deposits to the same recipient.
///
/// Each half gets its own ephemeral key, so on-chain the two notes are
/// unlinkable to each other. Used to break amount correlation between a
/// BTC deposit and later claims.
pub fn split_deposit(
    recipient: &StealthMetaAddress,
    total_sats: u64,
    first_sats: u64,
) -> Result<(StealthDeposit, StealthDeposit)> {
    if total_sats == 0 || total_sats > MAX_AMOUNT_SATS {
        return Err(StealthError::AmountOutOfRange(total_sats));
    }
    if first_sats == 0 || first_sats >= total_sats {
        return Err(StealthError::InvalidSplit);
    }
    let first = create_deposit(recipient, first_sats)?;
    let second = create_deposit(recipient, total_sats - first_sats)?;
    Ok((first, second))
}
