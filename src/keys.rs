//! Dual-key derivation and key material handling.
//!
//! Every identity owns two independent key pairs on the embedded curve:
//!
//! - the **spending** pair controls nullifier derivation and must never
//!   leave the owner;
//! - the **viewing** pair detects and decrypts incoming transfers and is
//!   safe to delegate (watch-only services, auditors).
//!
//! Both derive deterministically from a single 64-byte wallet signature via
//! domain-separated SHA-256, so no seed phrase or backup exists beyond the
//! wallet's own signing capability. The "spend"/"view" domain strings are
//! load-bearing: without them the two secrets would be hash-related and key
//! separation would collapse.
//!
//! Secrets are held in [`SecretScalar`], which zeroizes its buffer on drop.
//! This is best-effort hygiene, not a hard guarantee.

use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::curve::{AffinePoint, COMPRESSED_POINT_SIZE};
use crate::error::{Result, StealthError};
use crate::field::Scalar;

/// Expected wallet signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Meta-address wire size: two compressed points.
pub const META_ADDRESS_SIZE: usize = 2 * COMPRESSED_POINT_SIZE;

const SPEND_DOMAIN: &[u8] = b"spend";
const VIEW_DOMAIN: &[u8] = b"view";

/// A private scalar that zeroizes its 32-byte big-endian buffer on drop.
#[derive(Clone)]
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        SecretScalar { bytes }
    }

    pub fn from_scalar(scalar: &Scalar) -> Self {
        SecretScalar {
            bytes: scalar.to_bytes_be(),
        }
    }

    pub fn to_scalar(&self) -> Scalar {
        Scalar::from_bytes_be(&self.bytes)
    }

    /// Raw big-endian bytes. Handle with care; the caller is responsible
    /// for scrubbing any copies.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, also not through {:?}.
        f.write_str("SecretScalar(..)")
    }
}

/// The public half of an identity: what a sender needs to construct a
/// stealth deposit. Carries no amount or transaction linkage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StealthMetaAddress {
    pub spending_pub: AffinePoint,
    pub viewing_pub: AffinePoint,
}

impl StealthMetaAddress {
    /// Build from two points, rejecting infinity and off-curve inputs.
    pub fn new(spending_pub: AffinePoint, viewing_pub: AffinePoint) -> Result<Self> {
        if spending_pub.is_infinity()
            || viewing_pub.is_infinity()
            || !spending_pub.is_on_curve()
            || !viewing_pub.is_on_curve()
        {
            return Err(StealthError::InvalidPoint);
        }
        Ok(StealthMetaAddress {
            spending_pub,
            viewing_pub,
        })
    }

    /// 66-byte encoding: `compress(spending_pub) ‖ compress(viewing_pub)`.
    pub fn to_bytes(&self) -> [u8; META_ADDRESS_SIZE] {
        let mut out = [0u8; META_ADDRESS_SIZE];
        out[..COMPRESSED_POINT_SIZE].copy_from_slice(&self.spending_pub.compress());
        out[COMPRESSED_POINT_SIZE..].copy_from_slice(&self.viewing_pub.compress());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_ADDRESS_SIZE {
            return Err(StealthError::InvalidLength {
                expected: META_ADDRESS_SIZE,
                got: bytes.len(),
            });
        }
        let spending_pub = AffinePoint::decompress(&bytes[..COMPRESSED_POINT_SIZE])?;
        let viewing_pub = AffinePoint::decompress(&bytes[COMPRESSED_POINT_SIZE..])?;
        Self::new(spending_pub, viewing_pub)
    }

    /// Display encoding: 132 hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for StealthMetaAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for StealthMetaAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The delegatable scanning capability: viewing secret plus both public
/// keys, without the spending secret.
///
/// A holder can detect and decrypt incoming transfers but is algebraically
/// incapable of deriving the one-time stealth private key, which requires
/// the spending scalar.
pub struct ViewingKey {
    viewing_secret: SecretScalar,
    pub spending_pub: AffinePoint,
    pub viewing_pub: AffinePoint,
}

impl ViewingKey {
    pub fn new(
        viewing_secret: SecretScalar,
        spending_pub: AffinePoint,
        viewing_pub: AffinePoint,
    ) -> Self {
        ViewingKey {
            viewing_secret,
            spending_pub,
            viewing_pub,
        }
    }

    pub fn meta_address(&self) -> StealthMetaAddress {
        StealthMetaAddress {
            spending_pub: self.spending_pub.clone(),
            viewing_pub: self.viewing_pub.clone(),
        }
    }

    pub(crate) fn viewing_secret(&self) -> Scalar {
        self.viewing_secret.to_scalar()
    }
}

/// Complete key set for one identity.
///
/// Deliberately not `Clone`: secret duplication should be an explicit
/// `export_secrets` / `from_secrets` round trip, never accidental.
#[derive(Debug)]
pub struct StealthKeys {
    spending_secret: SecretScalar,
    viewing_secret: SecretScalar,
    pub spending_pub: AffinePoint,
    pub viewing_pub: AffinePoint,
}

impl StealthKeys {
    fn from_scalars(spending: Scalar, viewing: Scalar) -> Self {
        let g = AffinePoint::generator();
        let spending_pub = g.mul(&spending);
        let viewing_pub = g.mul(&viewing);
        StealthKeys {
            spending_secret: SecretScalar::from_scalar(&spending),
            viewing_secret: SecretScalar::from_scalar(&viewing),
            spending_pub,
            viewing_pub,
        }
    }

    /// Fresh random keys from OS entropy. Mostly useful for tests and
    /// throwaway identities; wallet-bound identities should use
    /// [`StealthKeys::from_signature`].
    pub fn generate() -> Self {
        let mut rng = OsRng;
        Self::from_scalars(Scalar::random(&mut rng), Scalar::random(&mut rng))
    }

    /// Deterministic derivation from a 64-byte wallet signature:
    ///
    /// ```text
    /// spending = SHA256(signature ‖ "spend") mod N
    /// viewing  = SHA256(signature ‖ "view")  mod N
    /// ```
    ///
    /// The same signature always yields the same keys.
    pub fn from_signature(signature: &[u8]) -> Result<Self> {
        if signature.len() != SIGNATURE_LENGTH {
            return Err(StealthError::InvalidSignatureLength(signature.len()));
        }
        let spending = derive_scalar(signature, SPEND_DOMAIN);
        let viewing = derive_scalar(signature, VIEW_DOMAIN);
        Ok(Self::from_scalars(spending, viewing))
    }

    /// Seed-based variant for deterministic tests: builds the synthetic
    /// 64-byte signature `SHA256(seed) ‖ SHA256(seed ‖ 0x01)` and derives
    /// exactly as [`StealthKeys::from_signature`] would.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let mut synthetic = [0u8; SIGNATURE_LENGTH];
        synthetic[..32].copy_from_slice(&Sha256::digest(seed));
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update([0x01]);
        synthetic[32..].copy_from_slice(&hasher.finalize());

        let keys = Self::from_signature(&synthetic);
        synthetic.zeroize();
        keys
    }

    /// Rehydrate from exported secrets.
    pub fn from_secrets(spending: &[u8; 32], viewing: &[u8; 32]) -> Self {
        Self::from_scalars(Scalar::from_bytes_be(spending), Scalar::from_bytes_be(viewing))
    }

    /// Export both secrets for encrypted external storage. Handle with
    /// extreme care.
    pub fn export_secrets(&self) -> ([u8; 32], [u8; 32]) {
        (*self.spending_secret.as_bytes(), *self.viewing_secret.as_bytes())
    }

    pub fn meta_address(&self) -> StealthMetaAddress {
        StealthMetaAddress {
            spending_pub: self.spending_pub.clone(),
            viewing_pub: self.viewing_pub.clone(),
        }
    }

    /// Split off the delegatable half. The result can scan but not spend.
    pub fn viewing_key(&self) -> ViewingKey {
        ViewingKey {
            viewing_secret: self.viewing_secret.clone(),
            spending_pub: self.spending_pub.clone(),
            viewing_pub: self.viewing_pub.clone(),
        }
    }

    pub(crate) fn spending_secret(&self) -> Scalar {
        self.spending_secret.to_scalar()
    }

    pub(crate) fn viewing_secret(&self) -> Scalar {
        self.viewing_secret.to_scalar()
    }
}

fn derive_scalar(signature: &[u8], domain: &[u8]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(signature);
    hasher.update(domain);
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hasher.finalize());
    let scalar = Scalar::from_bytes_be(&seed);
    seed.zeroize();
    scalar
}

/// Where key material comes from at the API boundary.
///
/// Callers hand over either raw wallet-signature bytes, a test seed, or an
/// already-derived key set; `resolve` turns any of them into concrete
/// [`StealthKeys`] exactly once, with validation up front.
pub enum KeySource {
    /// A wallet signature (must be exactly 64 bytes).
    Signature(Vec<u8>),
    /// An arbitrary seed, expanded to a synthetic signature.
    Seed(Vec<u8>),
    /// Keys derived earlier.
    Derived(StealthKeys),
}

impl KeySource {
    pub fn resolve(self) -> Result<StealthKeys> {
        match self {
            KeySource::Signature(mut sig) => {
                let keys = StealthKeys::from_signature(&sig);
                sig.zeroize();
                keys
            }
            KeySource::Seed(mut seed) => {
                let keys = StealthKeys::from_seed(&seed);
                seed.zeroize();
                keys
            }
            KeySource::Derived(keys) => Ok(keys),
        }
    }
}
