//! Recipient-side scanning over on-chain announcements.
//!
//! Scanning needs only the [`ViewingKey`]: for each announcement it redoes
//! the sender's Diffie-Hellman from the other side, decrypts the amount,
//! recomputes the one-time stealth key and its commitment, and accepts the
//! note only if the commitment matches exactly.
//!
//! The commitment check is the ownership test. A wrong viewing key produces
//! a different shared secret, hence a garbage amount and a mismatching
//! commitment; such announcements are skipped silently. Malformed
//! announcements (off-curve or infinity ephemeral keys) are likewise
//! skipped rather than erroring, so a single bad record cannot wedge a
//! wallet's scan loop.

use subtle::ConstantTimeEq;

use crate::amount::decrypt_amount;
use crate::curve::AffinePoint;
use crate::encoding::StealthAnnouncement;
use crate::error::MAX_AMOUNT_SATS;
use crate::keys::ViewingKey;
use crate::stealth::stealth_tweak;

/// A deposit recognized as ours, with everything needed to later claim it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedNote {
    pub amount_sats: u64,
    pub ephemeral_pub: AffinePoint,
    pub stealth_pub: AffinePoint,
    pub leaf_index: u64,
    pub commitment: [u8; 32],
}

/// Test a single announcement against a viewing key.
///
/// Returns `None` for announcements that are malformed or simply not ours;
/// the two cases are indistinguishable by design.
pub fn scan_announcement(
    viewing_key: &ViewingKey,
    announcement: &StealthAnnouncement,
) -> Option<ScannedNote> {
    let ephemeral_pub = AffinePoint::decompress(&announcement.ephemeral_pub).ok()?;
    if ephemeral_pub.is_infinity() {
        return None;
    }

    let shared_secret = ephemeral_pub.mul(&viewing_key.viewing_secret());
    if shared_secret.is_infinity() {
        return None;
    }

    let amount_sats = decrypt_amount(&announcement.encrypted_amount, &shared_secret);
    if amount_sats == 0 || amount_sats > MAX_AMOUNT_SATS {
        return None;
    }

    let tweak = stealth_tweak(&shared_secret);
    let stealth_pub = viewing_key
        .spending_pub
        .add(&AffinePoint::generator().mul(&tweak));

    let expected = crate::poseidon::commitment(&stealth_pub.x, amount_sats);
    if !bool::from(expected.ct_eq(&announcement.commitment)) {
        return None;
    }

    Some(ScannedNote {
        amount_sats,
        ephemeral_pub,
        stealth_pub,
        leaf_index: announcement.leaf_index,
        commitment: announcement.commitment,
    })
}

/// Scan a batch, returning the notes owned by `viewing_key` in input order.
pub fn scan_announcements(
    viewing_key: &ViewingKey,
    announcements: &[StealthAnnouncement],
) -> Vec<ScannedNote> {
    let notes: Vec<ScannedNote> = announcements
        .iter()
        .filter_map(|ann| scan_announcement(viewing_key, ann))
        .collect();
    tracing::debug!(
        scanned = announcements.len(),
        matched = notes.len(),
        "announcement scan complete"
    );
    notes
}
