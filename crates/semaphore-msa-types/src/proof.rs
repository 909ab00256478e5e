use crate::constants::{MAX_MERKLE_TREE_DEPTH, MIN_MERKLE_TREE_DEPTH, PROOF_POINTS};
use ethers::types::{H256, U256};
use serde::{Deserialize, Serialize};

/// Zero-knowledge group membership proof as submitted by a member.
///
/// The module only checks the public signals against the expected scope and
/// message and hands the rest to the proof verifier. Nothing but the derived
/// nullifier record outlives the call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreProof {
    pub merkle_tree_depth: u32,
    pub merkle_tree_root: U256,
    pub nullifier: U256,
    pub message: U256,
    pub scope: U256,
    pub points: [U256; PROOF_POINTS],
}

impl SemaphoreProof {
    pub fn depth_supported(&self) -> bool {
        (MIN_MERKLE_TREE_DEPTH..=MAX_MERKLE_TREE_DEPTH).contains(&self.merkle_tree_depth)
    }
}

pub fn hash_to_scope(tx_hash: H256) -> U256 {
    U256::from_big_endian(tx_hash.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof_with_depth(depth: u32) -> SemaphoreProof {
        SemaphoreProof {
            merkle_tree_depth: depth,
            merkle_tree_root: U256::one(),
            nullifier: U256::from(7u64),
            message: U256::zero(),
            scope: U256::zero(),
            points: [U256::zero(); PROOF_POINTS],
        }
    }

    #[test]
    fn test_depth_bounds() {
        assert!(!proof_with_depth(0).depth_supported());
        assert!(proof_with_depth(1).depth_supported());
        assert!(proof_with_depth(32).depth_supported());
        assert!(!proof_with_depth(33).depth_supported());
    }

    #[test]
    fn test_scope_conversion() {
        assert_eq!(hash_to_scope(H256::from_low_u64_be(0x5a)), U256::from(0x5au64));
        assert_eq!(hash_to_scope(H256::repeat_byte(0xff)), U256::MAX);
    }

    #[test]
    fn test_proof_json() {
        let proof = proof_with_depth(16);
        let json = serde_json::to_string(&proof).unwrap();
        let parsed: SemaphoreProof = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, proof);
    }
}
