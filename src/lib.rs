//! Stealth address cryptography core for the zVault BTC privacy bridge.
//!
//! Implements the dual-key stealth address protocol (DKSAP, in the style of
//! EIP-5564) over the Grumpkin curve, whose base field equals the BN254
//! scalar field so that every derived value is natively representable
//! inside the bridge's zk circuits. The crate covers the full off-chain
//! lifecycle:
//!
//! - [`keys`]: spending/viewing key derivation from a wallet signature;
//! - [`stealth`]: sender-side deposit construction (ephemeral ECDH,
//!   one-time stealth keys, Poseidon commitments, amount encryption);
//! - [`encoding`]: the 91-byte on-chain announcement format;
//! - [`scan`]: viewing-key scanning over announcements;
//! - [`claim`]: stealth private key recovery and nullifier derivation for
//!   the claim circuit.
//!
//! [`field`], [`curve`] and [`poseidon`] supply the underlying arithmetic:
//! big-integer field elements, short-Weierstrass group operations, and the
//! circom-compatible Poseidon permutation (t = 3).
//!
//! # Security model
//!
//! Arithmetic here is **not constant-time**; `num-bigint` operations leak
//! timing. That matches the deployment: key derivation and scanning run on
//! the owner's own machine, not a shared oracle. Secrets are wrapped in
//! zeroize-on-drop containers as best-effort hygiene. Comparisons that gate
//! note ownership use `subtle`.

pub mod amount;
pub mod claim;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod field;
pub mod keys;
pub mod poseidon;
pub mod scan;
pub mod stealth;

#[cfg(test)]
mod fuzz_tests;
#[cfg(test)]
mod test_vectors;

pub use amount::{decrypt_amount, encrypt_amount, ENCRYPTED_AMOUNT_SIZE};
pub use claim::{prepare_claim_inputs, ClaimInputs, MerkleProof};
pub use curve::{AffinePoint, COMPRESSED_POINT_SIZE, UNCOMPRESSED_POINT_SIZE};
pub use encoding::{StealthAnnouncement, ANNOUNCEMENT_DISCRIMINATOR, ANNOUNCEMENT_SIZE};
pub use error::{Result, StealthError, MAX_AMOUNT_SATS};
pub use field::{FieldElement, Scalar};
pub use keys::{
    KeySource, SecretScalar, StealthKeys, StealthMetaAddress, ViewingKey, META_ADDRESS_SIZE,
    SIGNATURE_LENGTH,
};
pub use poseidon::{circuit_hash1, circuit_hash2, commitment, nullifier, nullifier_hash};
pub use scan::{scan_announcement, scan_announcements, ScannedNote};
pub use stealth::{
    create_deposit, create_deposit_with_ephemeral, split_deposit, StealthDeposit,
    STEALTH_KDF_DOMAIN,
};
