//! Property-based tests over randomized inputs.
//!
//! These hammer the algebraic laws the protocol relies on (group structure,
//! XOR involution, scan/claim inverses) rather than fixed vectors; the
//! known-answer side lives in `test_vectors`.

use proptest::prelude::*;

use crate::amount::{decrypt_amount, encrypt_amount};
use crate::claim::{prepare_claim_inputs, MerkleProof};
use crate::curve::AffinePoint;
use crate::encoding::StealthAnnouncement;
use crate::error::MAX_AMOUNT_SATS;
use crate::field::Scalar;
use crate::keys::StealthKeys;
use crate::scan::{scan_announcement, scan_announcements};
use crate::stealth::{create_deposit, create_deposit_with_ephemeral};

fn empty_proof() -> MerkleProof {
    MerkleProof {
        root: [0u8; 32],
        path_elements: vec![],
        path_indices: vec![],
    }
}

proptest! {
    #[test]
    fn scalar_mul_distributes_over_addition(a in 1u64.., b in 1u64..) {
        let g = AffinePoint::generator();
        let sum = Scalar::from_u64(a).add(&Scalar::from_u64(b));
        let lhs = g.mul(&sum);
        let rhs = g.mul(&Scalar::from_u64(a)).add(&g.mul(&Scalar::from_u64(b)));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn compression_round_trips(k in 1u64..) {
        let p = AffinePoint::generator().mul(&Scalar::from_u64(k));
        let back = AffinePoint::decompress(&p.compress()).unwrap();
        prop_assert_eq!(back, p);
    }

    #[test]
    fn amount_encryption_is_an_involution(amount: u64, k in 1u64..) {
        let ss = AffinePoint::generator().mul(&Scalar::from_u64(k));
        let ct = encrypt_amount(amount, &ss);
        prop_assert_eq!(decrypt_amount(&ct, &ss), amount);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn deposit_scan_claim_round_trip(
        seed: [u8; 32],
        eph_seed: [u8; 32],
        amount in 1u64..=MAX_AMOUNT_SATS,
        leaf: u64,
    ) {
        let keys = StealthKeys::from_seed(&seed).unwrap();
        let ephemeral = Scalar::from_bytes_be(&eph_seed);
        prop_assume!(!ephemeral.is_zero());

        let deposit = create_deposit_with_ephemeral(
            &keys.meta_address(),
            amount,
            &ephemeral,
            0,
        ).unwrap();
        let ann = StealthAnnouncement::from_deposit(&deposit, leaf);

        let note = scan_announcement(&keys.viewing_key(), &ann)
            .expect("owner must recognize own deposit");
        prop_assert_eq!(note.amount_sats, amount);
        prop_assert_eq!(note.leaf_index, leaf);

        let inputs = prepare_claim_inputs(&keys, &note, &empty_proof()).unwrap();
        prop_assert_eq!(inputs.amount_pub, amount);
        prop_assert_eq!(
            crate::poseidon::nullifier_hash(&inputs.nullifier),
            inputs.nullifier_hash
        );
        prop_assert_eq!(
            AffinePoint::generator().mul(&inputs.stealth_priv.to_scalar()),
            note.stealth_pub
        );
    }

    #[test]
    fn scanning_with_the_wrong_viewing_key_finds_nothing(
        alice_seed: [u8; 32],
        bob_seed: [u8; 32],
        amount in 1u64..=MAX_AMOUNT_SATS,
    ) {
        prop_assume!(alice_seed != bob_seed);
        let alice = StealthKeys::from_seed(&alice_seed).unwrap();
        let bob = StealthKeys::from_seed(&bob_seed).unwrap();

        let deposit = create_deposit(&alice.meta_address(), amount).unwrap();
        let ann = StealthAnnouncement::from_deposit(&deposit, 0);

        prop_assert!(scan_announcement(&bob.viewing_key(), &ann).is_none());
        prop_assert!(scan_announcement(&alice.viewing_key(), &ann).is_some());
    }
}

/// Bulk isolation check: a thousand deposits for one identity, none of
/// them visible to another.
#[test]
fn thousand_foreign_announcements_yield_zero_matches() {
    let alice = StealthKeys::from_seed(b"bulk-isolation-alice").unwrap();
    let bob = StealthKeys::from_seed(b"bulk-isolation-bob").unwrap();
    let meta = alice.meta_address();

    let announcements: Vec<StealthAnnouncement> = (0..1000u64)
        .map(|i| {
            let eph = Scalar::from_u64(i + 1);
            let deposit =
                create_deposit_with_ephemeral(&meta, 1_000 + i, &eph, 0).unwrap();
            StealthAnnouncement::from_deposit(&deposit, i)
        })
        .collect();

    assert_eq!(scan_announcements(&bob.viewing_key(), &announcements).len(), 0);
    assert_eq!(
        scan_announcements(&alice.viewing_key(), &announcements).len(),
        1000
    );
}
