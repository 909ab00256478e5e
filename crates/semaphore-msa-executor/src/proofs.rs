use crate::collaborators::{Clock, GroupRegistry, ProofVerifier};
use semaphore_msa_crypto::approve_message;
use semaphore_msa_types::{hash_to_scope, GroupId, MsaError, MsaResult, SemaphoreProof, H256};
use tracing::{debug, warn};

/// Checks one approval proof for `tx_hash` against the account's group.
///
/// Runs root, depth and binding checks before the proof verifier sees the
/// proof. Does not look at nullifiers; the caller owns that record.
pub async fn verify_approval(
    registry: &dyn GroupRegistry,
    verifier: &dyn ProofVerifier,
    clock: &dyn Clock,
    group_id: GroupId,
    tx_hash: H256,
    proof: &SemaphoreProof,
) -> MsaResult<()> {
    let current = registry
        .current_root(group_id)
        .await
        .ok_or(MsaError::GroupDoesNotExist { group_id })?;

    if proof.merkle_tree_root != current.root {
        let created_at = registry
            .root_created_at(group_id, proof.merkle_tree_root)
            .await
            .ok_or(MsaError::MerkleTreeRootIsNotPartOfTheGroup {
                group_id,
                root: proof.merkle_tree_root,
            })?;
        let duration = registry.root_validity_duration(group_id).await;
        if clock.now() > created_at.saturating_add(duration) {
            warn!("Proof rejected: root {} of group {} expired", proof.merkle_tree_root, group_id);
            return Err(MsaError::MerkleTreeRootIsExpired {
                group_id,
                root: proof.merkle_tree_root,
            });
        }
        debug!("Accepting historic root {} of group {}", proof.merkle_tree_root, group_id);
    }

    if !proof.depth_supported() {
        return Err(MsaError::MerkleTreeDepthIsNotSupported {
            depth: proof.merkle_tree_depth,
        });
    }

    if proof.scope != hash_to_scope(tx_hash) {
        return Err(MsaError::InvalidSemaphoreProof {
            reason: format!("scope does not match transaction {:?}", tx_hash),
        });
    }
    if proof.message != approve_message() {
        return Err(MsaError::InvalidSemaphoreProof {
            reason: "message is not the approve message".into(),
        });
    }

    if !verifier.verify(proof) {
        warn!("Proof rejected by verifier for transaction {:?}", tx_hash);
        return Err(MsaError::InvalidProof);
    }

    Ok(())
}
