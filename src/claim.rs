//! Claim preparation: turning a scanned note into zk-circuit inputs.
//!
//! The one-time stealth private key is derived additively:
//!
//! ```text
//! k'  = s + k mod N          (s = spending secret, k = stealth tweak)
//! ```
//!
//! so that `k'·G = P + k·G = P'` matches the note's stealth public key.
//! That equation is re-verified here before anything else; a mismatch means
//! the note was scanned with different keys or tampered with, and claiming
//! fails closed rather than producing a nullifier for a key we do not
//! control.
//!
//! Nullifiers are bound to the tree position, `Poseidon(k', leaf_index)`,
//! so the same stealth key at two leaves yields two independent nullifiers
//! and spending one cannot invalidate the other.

use serde::{Deserialize, Serialize};

use crate::curve::AffinePoint;
use crate::encoding::{hex_array, hex_vec};
use crate::error::{Result, StealthError};
use crate::keys::{SecretScalar, StealthKeys};
use crate::poseidon;
use crate::scan::ScannedNote;
use crate::stealth::stealth_tweak;

/// Merkle inclusion proof for a note's commitment, as served by an indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    #[serde(with = "hex_array")]
    pub root: [u8; 32],
    #[serde(with = "hex_vec")]
    pub path_elements: Vec<[u8; 32]>,
    pub path_indices: Vec<u8>,
}

/// Full witness package for the claim circuit.
///
/// `stealth_priv` is the circuit's private input; `nullifier_hash`,
/// `merkle_root` and `amount_pub` are the public inputs the contract
/// checks. The secret zeroizes on drop with the rest of the struct.
#[derive(Debug)]
pub struct ClaimInputs {
    pub stealth_priv: SecretScalar,
    pub amount_sats: u64,
    pub leaf_index: u64,
    pub merkle_path: Vec<[u8; 32]>,
    pub merkle_indices: Vec<u8>,
    pub merkle_root: [u8; 32],
    pub nullifier: [u8; 32],
    pub nullifier_hash: [u8; 32],
    pub amount_pub: u64,
}

/// Derive the stealth private key for `note` and assemble claim inputs.
pub fn prepare_claim_inputs(
    keys: &StealthKeys,
    note: &ScannedNote,
    proof: &MerkleProof,
) -> Result<ClaimInputs> {
    let shared_secret = note.ephemeral_pub.mul(&keys.viewing_secret());
    if shared_secret.is_infinity() {
        return Err(StealthError::EcdhFailure);
    }

    let tweak = stealth_tweak(&shared_secret);
    let stealth_priv = keys.spending_secret().add(&tweak);

    // k'·G must equal the note's stealth public key.
    if AffinePoint::generator().mul(&stealth_priv) != note.stealth_pub {
        return Err(StealthError::StealthKeyMismatch);
    }

    let nullifier = poseidon::nullifier(&stealth_priv, note.leaf_index);
    let nullifier_hash = poseidon::nullifier_hash(&nullifier);

    Ok(ClaimInputs {
        stealth_priv: SecretScalar::from_scalar(&stealth_priv),
        amount_sats: note.amount_sats,
        leaf_index: note.leaf_index,
        merkle_path: proof.path_elements.clone(),
        merkle_indices: proof.path_indices.clone(),
        merkle_root: proof.root,
        nullifier,
        nullifier_hash,
        amount_pub: note.amount_sats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::StealthAnnouncement;
    use crate::scan::scan_announcement;
    use crate::stealth::create_deposit;

    fn proof() -> MerkleProof {
        MerkleProof {
            root: [0x33; 32],
            path_elements: vec![[0x01; 32], [0x02; 32]],
            path_indices: vec![0, 1],
        }
    }

    fn note_for(keys: &StealthKeys, amount: u64, leaf: u64) -> ScannedNote {
        let deposit = create_deposit(&keys.meta_address(), amount).unwrap();
        let ann = StealthAnnouncement::from_deposit(&deposit, leaf);
        scan_announcement(&keys.viewing_key(), &ann).unwrap()
    }

    #[test]
    fn derived_key_opens_the_note() {
        let keys = StealthKeys::from_seed(b"claim-owner").unwrap();
        let note = note_for(&keys, 60_000, 5);

        let inputs = prepare_claim_inputs(&keys, &note, &proof()).unwrap();
        assert_eq!(inputs.amount_sats, 60_000);
        assert_eq!(inputs.amount_pub, 60_000);
        assert_eq!(inputs.leaf_index, 5);
        assert_eq!(inputs.merkle_root, [0x33; 32]);
        assert_eq!(
            poseidon::nullifier_hash(&inputs.nullifier),
            inputs.nullifier_hash
        );

        // The packaged secret regenerates the note's public key.
        let recovered = AffinePoint::generator().mul(&inputs.stealth_priv.to_scalar());
        assert_eq!(recovered, note.stealth_pub);
    }

    #[test]
    fn wrong_keys_fail_closed() {
        let alice = StealthKeys::from_seed(b"claim-alice").unwrap();
        let bob = StealthKeys::from_seed(b"claim-bob").unwrap();
        let note = note_for(&alice, 60_000, 0);

        assert_eq!(
            prepare_claim_inputs(&bob, &note, &proof()).unwrap_err(),
            StealthError::StealthKeyMismatch
        );
    }

    #[test]
    fn nullifier_is_deterministic_per_leaf() {
        let keys = StealthKeys::from_seed(b"claim-determinism").unwrap();
        let note = note_for(&keys, 10_000, 7);

        let a = prepare_claim_inputs(&keys, &note, &proof()).unwrap();
        let b = prepare_claim_inputs(&keys, &note, &proof()).unwrap();
        assert_eq!(a.nullifier, b.nullifier);
        assert_eq!(a.nullifier_hash, b.nullifier_hash);

        let mut moved = note.clone();
        moved.leaf_index = 8;
        let c = prepare_claim_inputs(&keys, &moved, &proof()).unwrap();
        assert_ne!(a.nullifier, c.nullifier);
        assert_ne!(a.nullifier_hash, c.nullifier_hash);
    }

    #[test]
    fn merkle_proof_serde_round_trip() {
        let p = proof();
        let json = serde_json::to_string(&p).unwrap();
        // Byte fields travel as hex strings, path included.
        assert!(json.contains(&hex::encode([0x33u8; 32])));
        assert!(json.contains(&hex::encode([0x01u8; 32])));
        assert!(json.contains(&hex::encode([0x02u8; 32])));
        assert_eq!(serde_json::from_str::<MerkleProof>(&json).unwrap(), p);
    }

    #[test]
    fn merkle_proof_rejects_malformed_path_hex() {
        let json = r#"{"root":"0000000000000000000000000000000000000000000000000000000000000000","path_elements":["abcd"],"path_indices":[0]}"#;
        assert!(serde_json::from_str::<MerkleProof>(json).is_err());
    }
}
