//! Amount encryption for stealth announcements.
//!
//! The 8-byte satoshi amount is XORed with a keystream derived from the
//! ECDH shared secret:
//!
//! ```text
//! key        = SHA256(compress(shared_secret))[0..8]
//! ciphertext = le_bytes(amount) ^ key
//! ```
//!
//! This is a one-time pad, sound only under the protocol's usage pattern:
//! each shared secret comes from a fresh ephemeral key and encrypts exactly
//! one amount. It provides confidentiality against observers without the
//! viewing key, and no integrity; the Poseidon commitment in the same
//! announcement is what binds the amount.

use sha2::{Digest, Sha256};

use crate::curve::AffinePoint;

/// Encrypted amount wire size.
pub const ENCRYPTED_AMOUNT_SIZE: usize = 8;

fn stream_key(shared_secret: &AffinePoint) -> [u8; ENCRYPTED_AMOUNT_SIZE] {
    let digest = Sha256::digest(shared_secret.compress());
    let mut key = [0u8; ENCRYPTED_AMOUNT_SIZE];
    key.copy_from_slice(&digest[..ENCRYPTED_AMOUNT_SIZE]);
    key
}

/// Encrypt a satoshi amount under the ECDH shared secret.
pub fn encrypt_amount(amount_sats: u64, shared_secret: &AffinePoint) -> [u8; ENCRYPTED_AMOUNT_SIZE] {
    let key = stream_key(shared_secret);
    let mut out = amount_sats.to_le_bytes();
    for (byte, k) in out.iter_mut().zip(key.iter()) {
        *byte ^= k;
    }
    out
}

/// Decrypt an announcement's amount field. XOR is an involution, so this
/// is `encrypt_amount` applied to the ciphertext.
pub fn decrypt_amount(
    ciphertext: &[u8; ENCRYPTED_AMOUNT_SIZE],
    shared_secret: &AffinePoint,
) -> u64 {
    let key = stream_key(shared_secret);
    let mut bytes = *ciphertext;
    for (byte, k) in bytes.iter_mut().zip(key.iter()) {
        *byte ^= k;
    }
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Scalar;

    fn test_point(k: u64) -> AffinePoint {
        AffinePoint::generator().mul(&Scalar::from_u64(k))
    }

    #[test]
    fn round_trip() {
        let ss = test_point(7);
        for amount in [0u64, 1, 546, 100_000, u64::MAX] {
            let ct = encrypt_amount(amount, &ss);
            assert_eq!(decrypt_amount(&ct, &ss), amount);
        }
    }

    #[test]
    fn ciphertext_depends_on_shared_secret() {
        let amount = 250_000;
        let a = encrypt_amount(amount, &test_point(3));
        let b = encrypt_amount(amount, &test_point(4));
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_secret_decrypts_to_garbage() {
        let amount = 1_000_000;
        let ct = encrypt_amount(amount, &test_point(11));
        assert_ne!(decrypt_amount(&ct, &test_point(12)), amount);
    }

    #[test]
    fn keystream_is_deterministic() {
        let ss = test_point(9);
        assert_eq!(encrypt_amount(42, &ss), encrypt_amount(42, &ss));
    }
}
