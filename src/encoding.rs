//! Wire format for on-chain stealth announcements.
//!
//! Fixed 91-byte layout, all integers little-endian:
//!
//! ```text
//! offset  size  field
//!      0     1  discriminator (0x08)
//!      1     1  bump
//!      2    33  ephemeral public key (compressed)
//!     35     8  encrypted amount
//!     43    32  commitment
//!     75     8  leaf index (u64 LE)
//!     83     8  created_at (i64 LE, unix seconds)
//! ```
//!
//! Point and commitment bytes pass through untouched; decompression and
//! validation happen at scan time, not parse time, so a single malformed
//! announcement cannot abort a batch parse.

use serde::{Deserialize, Serialize};

use crate::amount::ENCRYPTED_AMOUNT_SIZE;
use crate::curve::COMPRESSED_POINT_SIZE;
use crate::error::{Result, StealthError};
use crate::stealth::StealthDeposit;

/// Account discriminator identifying a stealth announcement record.
pub const ANNOUNCEMENT_DISCRIMINATOR: u8 = 0x08;

/// Total serialized size in bytes.
pub const ANNOUNCEMENT_SIZE: usize = 2 + COMPRESSED_POINT_SIZE + ENCRYPTED_AMOUNT_SIZE + 32 + 8 + 8;

/// One on-chain announcement, as read back from the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthAnnouncement {
    pub bump: u8,
    #[serde(with = "hex_array")]
    pub ephemeral_pub: [u8; COMPRESSED_POINT_SIZE],
    #[serde(with = "hex_array")]
    pub encrypted_amount: [u8; ENCRYPTED_AMOUNT_SIZE],
    #[serde(with = "hex_array")]
    pub commitment: [u8; 32],
    pub leaf_index: u64,
    pub created_at: i64,
}

impl StealthAnnouncement {
    /// Package a freshly created deposit under its assigned tree leaf.
    pub fn from_deposit(deposit: &StealthDeposit, leaf_index: u64) -> Self {
        StealthAnnouncement {
            bump: 0,
            ephemeral_pub: deposit.ephemeral_pub,
            encrypted_amount: deposit.encrypted_amount,
            commitment: deposit.commitment,
            leaf_index,
            created_at: deposit.created_at,
        }
    }

    pub fn to_bytes(&self) -> [u8; ANNOUNCEMENT_SIZE] {
        let mut out = [0u8; ANNOUNCEMENT_SIZE];
        out[0] = ANNOUNCEMENT_DISCRIMINATOR;
        out[1] = self.bump;
        out[2..35].copy_from_slice(&self.ephemeral_pub);
        out[35..43].copy_from_slice(&self.encrypted_amount);
        out[43..75].copy_from_slice(&self.commitment);
        out[75..83].copy_from_slice(&self.leaf_index.to_le_bytes());
        out[83..91].copy_from_slice(&self.created_at.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ANNOUNCEMENT_SIZE {
            return Err(StealthError::InvalidLength {
                expected: ANNOUNCEMENT_SIZE,
                got: bytes.len(),
            });
        }
        if bytes[0] != ANNOUNCEMENT_DISCRIMINATOR {
            return Err(StealthError::InvalidDiscriminator(bytes[0]));
        }

        let mut ephemeral_pub = [0u8; COMPRESSED_POINT_SIZE];
        ephemeral_pub.copy_from_slice(&bytes[2..35]);
        let mut encrypted_amount = [0u8; ENCRYPTED_AMOUNT_SIZE];
        encrypted_amount.copy_from_slice(&bytes[35..43]);
        let mut commitment = [0u8; 32];
        commitment.copy_from_slice(&bytes[43..75]);

        let mut le8 = [0u8; 8];
        le8.copy_from_slice(&bytes[75..83]);
        let leaf_index = u64::from_le_bytes(le8);
        le8.copy_from_slice(&bytes[83..91]);
        let created_at = i64::from_le_bytes(le8);
        if created_at < 0 {
            return Err(StealthError::InvalidTimestamp);
        }

        Ok(StealthAnnouncement {
            bump: bytes[1],
            ephemeral_pub,
            encrypted_amount,
            commitment,
            leaf_index,
            created_at,
        })
    }
}

/// Hex string serde for fixed-size byte arrays, matching the display
/// convention used across zVault tooling.
pub(crate) mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("wrong byte length"))
    }
}

/// Seq-of-hex-strings serde for lists of fixed-size byte arrays, the
/// shape an indexer serves Merkle paths in.
pub(crate) mod hex_vec {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(
        items: &[[u8; N]],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&hex::encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<Vec<[u8; N]>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| {
                let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
                bytes
                    .try_into()
                    .map_err(|_| serde::de::Error::custom("wrong byte length"))
            })
            .collect()
    }
}
