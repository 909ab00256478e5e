use super::registry::RootMembership;
use crate::collaborators::{MerkleRoot, ProofVerifier};
use semaphore_msa_crypto::{approve_message, hash_to_field, keccak256};
use semaphore_msa_types::{hash_to_scope, Commitment, SemaphoreProof, H256, PROOF_POINTS, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

fn word(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}

/// Digest a dev proof must carry in `points[0]`. Covers the prover's
/// commitment, carried in `points[1]`.
pub fn dev_seal(proof: &SemaphoreProof) -> U256 {
    let mut data = Vec::with_capacity(6 * 32 + 3);
    data.extend_from_slice(b"dev");
    data.extend_from_slice(&word(U256::from(proof.merkle_tree_depth)));
    data.extend_from_slice(&word(proof.merkle_tree_root));
    data.extend_from_slice(&word(proof.nullifier));
    data.extend_from_slice(&word(proof.message));
    data.extend_from_slice(&word(proof.scope));
    data.extend_from_slice(&word(proof.points[1]));
    hash_to_field(&data)
}

/// Dev-mode verifier: accepts a proof when its first point seals the public
/// signals and the sealed commitment belongs to the claimed root. No
/// zero-knowledge property; tests and simulations only.
#[derive(Debug)]
pub struct DevProofVerifier {
    membership: RootMembership,
    passed: AtomicU64,
    failed: AtomicU64,
}

impl DevProofVerifier {
    pub fn new(membership: RootMembership) -> Self {
        Self {
            membership,
            passed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> (u64, u64) {
        (self.passed.load(Ordering::Relaxed), self.failed.load(Ordering::Relaxed))
    }
}

impl ProofVerifier for DevProofVerifier {
    fn verify(&self, proof: &SemaphoreProof) -> bool {
        let valid = proof.points[0] == dev_seal(proof)
            && self
                .membership
                .contains(proof.merkle_tree_root, &Commitment(proof.points[1]));
        if valid {
            self.passed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
            debug!("Dev verifier rejected proof with nullifier {}", proof.nullifier);
        }
        valid
    }
}

/// Member identity able to produce dev proofs.
#[derive(Clone)]
pub struct DevIdentity {
    secret: [u8; 32],
    commitment: Commitment,
}

impl DevIdentity {
    pub fn new(secret: [u8; 32]) -> Self {
        let commitment = Commitment(hash_to_field(&secret));
        Self { secret, commitment }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(keccak256(&seed.to_be_bytes()))
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Same identity and scope always give the same nullifier.
    pub fn nullifier(&self, scope: U256) -> U256 {
        let mut data = self.secret.to_vec();
        data.extend_from_slice(&word(scope));
        hash_to_field(&data)
    }

    /// Approval proof for `tx_hash` against `root`.
    pub fn prove(&self, root: MerkleRoot, tx_hash: H256) -> SemaphoreProof {
        let scope = hash_to_scope(tx_hash);
        let mut proof = SemaphoreProof {
            merkle_tree_depth: root.depth,
            merkle_tree_root: root.root,
            nullifier: self.nullifier(scope),
            message: approve_message(),
            scope,
            points: [U256::zero(); PROOF_POINTS],
        };
        proof.points[1] = self.commitment.0;
        proof.points[0] = dev_seal(&proof);
        proof
    }
}

impl std::fmt::Debug for DevIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevIdentity")
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}
