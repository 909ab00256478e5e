use crate::commitment::Commitment;
use crate::transaction::PendingTransaction;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// Complete, comparable view of one account's module state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account: Address,
    pub installed: bool,
    pub threshold: u8,
    pub group_id: Option<U256>,
    pub sequence_number: u64,
    pub members: Vec<Commitment>,
    /// Ordered by `created_at_seq`.
    pub pending: Vec<PendingTransaction>,
    /// Consumed `(scope, nullifier)` pairs, sorted.
    pub nullifiers: Vec<(H256, U256)>,
}

impl AccountSnapshot {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
