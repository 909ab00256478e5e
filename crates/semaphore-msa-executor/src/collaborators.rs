//! Seams to the systems this module consumes but never implements.

use async_trait::async_trait;
use semaphore_msa_types::{Address, Bytes, Commitment, GroupId, MsaResult, SemaphoreProof, H256, U256};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MerkleRoot {
    pub root: U256,
    pub depth: u32,
}

/// External Merkle group registry holding each account's commitment set.
#[async_trait]
pub trait GroupRegistry: Send + Sync {
    async fn create_group(&self, admin: Address) -> MsaResult<GroupId>;

    async fn add_members(&self, group_id: GroupId, commitments: &[Commitment]) -> MsaResult<()>;

    async fn remove_member(&self, group_id: GroupId, commitment: Commitment) -> MsaResult<()>;

    /// Drops a group created by an install that did not complete.
    async fn delete_group(&self, group_id: GroupId) -> MsaResult<()>;

    /// `None` when the group does not exist.
    async fn current_root(&self, group_id: GroupId) -> Option<MerkleRoot>;

    /// Unix seconds at which `root` stopped being current, if it ever was
    /// a root of this group.
    async fn root_created_at(&self, group_id: GroupId, root: U256) -> Option<u64>;

    async fn root_validity_duration(&self, group_id: GroupId) -> u64;
}

/// Zero-knowledge proof checker. Only ever sees proofs whose root is already
/// known to the group registry.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &SemaphoreProof) -> bool;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("call reverted: {reason}")]
pub struct CallRevert {
    pub reason: String,
}

impl CallRevert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Performs an external call on behalf of an account.
#[async_trait]
pub trait CallExecutor: Send + Sync {
    async fn call(
        &self,
        account: Address,
        target: Address,
        value: U256,
        call_data: &Bytes,
    ) -> Result<Bytes, CallRevert>;
}

pub trait Clock: Send + Sync {
    /// Unix seconds.
    fn now(&self) -> u64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Member public key as two field elements.
pub type MemberPublicKey = [U256; 2];

/// Per-member signing scheme the gateway uses to tie a user operation to a
/// roster entry.
pub trait MemberSignatureScheme: Send + Sync {
    fn commitment_of(&self, public_key: &MemberPublicKey) -> Commitment;

    fn verify(&self, public_key: &MemberPublicKey, message: &H256, signature: &[u8]) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_moves() {
        assert!(SystemClock.now() > 1_600_000_000);
    }

    #[test]
    fn test_call_revert_display() {
        assert_eq!(CallRevert::new("out of gas").to_string(), "call reverted: out of gas");
    }
}
