//! Known-answer vectors for the full deposit, scan and claim pipeline.
//!
//! All values were generated with an independent reference implementation
//! of the protocol math and are frozen here. Any change to key derivation,
//! the stealth KDF, amount encryption or the Poseidon hash will break one
//! of these vectors loudly.

use sha2::{Digest, Sha256};

use crate::claim::{prepare_claim_inputs, MerkleProof};
use crate::curve::AffinePoint;
use crate::encoding::StealthAnnouncement;
use crate::field::Scalar;
use crate::keys::StealthKeys;
use crate::scan::scan_announcement;
use crate::stealth::create_deposit_with_ephemeral;

const AMOUNT_SATS: u64 = 100_000;
const CREATED_AT: i64 = 1_700_000_000;

/// 32-byte seed: `"test-seed-"` followed by 22 zero bytes.
fn seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[..10].copy_from_slice(b"test-seed-");
    seed
}

fn keys() -> StealthKeys {
    StealthKeys::from_seed(&seed()).unwrap()
}

/// Fixed ephemeral scalar: `SHA256("test-ephemeral") mod N`.
fn ephemeral() -> Scalar {
    let digest: [u8; 32] = Sha256::digest(b"test-ephemeral").into();
    Scalar::from_bytes_be(&digest)
}

fn unhex32(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&hex::decode(s).unwrap());
    out
}

#[test]
fn key_derivation_vector() {
    let keys = keys();
    let (spending, viewing) = keys.export_secrets();
    assert_eq!(
        spending,
        unhex32("00a925eb3f85943d68ebc9c61a9f1a09c8659a09a3e7818ac539848de96c6ce3")
    );
    assert_eq!(
        viewing,
        unhex32("251d1b3f5fdb326d13013dc8651cb300eebb7ab1c86cd0cee587f27858122b97")
    );
    assert_eq!(
        hex::encode(keys.spending_pub.compress()),
        "032d959f57c56a81652e6c80ea61799fae13c83680f60fcc868e68471f448b8751"
    );
    assert_eq!(
        hex::encode(keys.viewing_pub.compress()),
        "03304add35372938542acc272435ea20fc5a76fa9a8709fe204f9743f0ffba5398"
    );
}

#[test]
fn deposit_vector() {
    let deposit =
        create_deposit_with_ephemeral(&keys().meta_address(), AMOUNT_SATS, &ephemeral(), CREATED_AT)
            .unwrap();

    assert_eq!(
        hex::encode(deposit.ephemeral_pub),
        "0328a39d1f6183cbf918e62653e25cb7aa8e5a8ae4a95eed9dac11c12a100c8a73"
    );
    assert_eq!(hex::encode(deposit.encrypted_amount), "37a203c89ea5a414");
    assert_eq!(
        deposit.commitment,
        unhex32("207edc1eec253154cfcb7c1280d648768a6bde4701aa9dce75df657baefaadda")
    );
}

#[test]
fn shared_secret_is_symmetric() {
    let keys = keys();
    let eph = ephemeral();
    let eph_pub = AffinePoint::generator().mul(&eph);

    // Sender side: r·V. Recipient side: v·R.
    let (_, viewing) = keys.export_secrets();
    let sender = keys.viewing_pub.mul(&eph);
    let recipient = eph_pub.mul(&Scalar::from_bytes_be(&viewing));
    assert_eq!(sender, recipient);
    assert_eq!(
        hex::encode(sender.compress()),
        "021e6c5ac085d4c0bf1782e65ef49b4431009539997f3f3c7404127dee167a3a8a"
    );
}

#[test]
fn scan_and_claim_vector() {
    let keys = keys();
    let deposit =
        create_deposit_with_ephemeral(&keys.meta_address(), AMOUNT_SATS, &ephemeral(), CREATED_AT)
            .unwrap();

    let ann = StealthAnnouncement::from_deposit(&deposit, 0);
    let note = scan_announcement(&keys.viewing_key(), &ann).unwrap();
    assert_eq!(note.amount_sats, AMOUNT_SATS);
    assert_eq!(
        hex::encode(note.stealth_pub.compress()),
        "02042a23face6ed705491e90b227b8b9966cd90d061ccbf9fbf4563d8788ff46f7"
    );

    let proof = MerkleProof {
        root: [0u8; 32],
        path_elements: vec![],
        path_indices: vec![],
    };
    let inputs = prepare_claim_inputs(&keys, &note, &proof).unwrap();
    assert_eq!(
        *inputs.stealth_priv.as_bytes(),
        unhex32("2ac05bad739e113f2942a25e744ee706b5438b7acbb5a1b837ef2a5f7486a691")
    );
    assert_eq!(
        inputs.nullifier,
        unhex32("1b04427b8f6b0db306bd4cd8c94f059d62221c367ffc0569b9e624c3f424b51b")
    );
    assert_eq!(
        inputs.nullifier_hash,
        unhex32("01457d784a0c547ff5a8dfb62488c6b36a7d905db3759f1e20dc8a9b143ae772")
    );

    // Same note at leaf 1 gives an independent nullifier.
    let ann1 = StealthAnnouncement::from_deposit(&deposit, 1);
    let note1 = scan_announcement(&keys.viewing_key(), &ann1).unwrap();
    let inputs1 = prepare_claim_inputs(&keys, &note1, &proof).unwrap();
    assert_eq!(
        inputs1.nullifier,
        unhex32("2bd17a470ce175152d229fbbc3788e33098bf9eec7d6a4195d04eced548ec7df")
    );
}

#[test]
fn announcement_bytes_round_trip_the_vector() {
    let deposit =
        create_deposit_with_ephemeral(&keys().meta_address(), AMOUNT_SATS, &ephemeral(), CREATED_AT)
            .unwrap();
    let ann = StealthAnnouncement::from_deposit(&deposit, 7);
    let parsed = StealthAnnouncement::from_bytes(&ann.to_bytes()).unwrap();
    assert_eq!(parsed, ann);
    assert_eq!(parsed.created_at, CREATED_AT);
    assert_eq!(parsed.leaf_index, 7);
}
