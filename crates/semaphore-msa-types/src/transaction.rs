use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Collecting approvals, threshold not yet met.
    Initiated,
    /// Threshold met; may be executed by anyone holding a gated credential.
    Approved,
}

/// A proposed external call waiting for approvals or execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub tx_hash: H256,
    pub target: Address,
    pub value: U256,
    pub call_data: Bytes,
    pub approval_count: u8,
    pub created_at_seq: u64,
}

impl PendingTransaction {
    pub fn is_executable(&self, threshold: u8) -> bool {
        self.approval_count >= threshold
    }

    pub fn status(&self, threshold: u8) -> TxStatus {
        if self.is_executable(threshold) {
            TxStatus::Approved
        } else {
            TxStatus::Initiated
        }
    }
}

/// Result of an execution attempted as part of an initiate/sign call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionStatus {
    NotRequested,
    /// Auto-execution was requested but the threshold is not met yet.
    Deferred,
    Executed { return_data: Bytes },
    /// The external call failed; approvals are kept and execution may be retried.
    Failed { reason: String },
}

impl ExecutionStatus {
    pub fn is_executed(&self) -> bool {
        matches!(self, ExecutionStatus::Executed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalReceipt {
    pub tx_hash: H256,
    pub approval_count: u8,
    pub execution: ExecutionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_threshold() {
        let mut tx = PendingTransaction {
            tx_hash: H256::repeat_byte(1),
            target: Address::repeat_byte(2),
            value: U256::from(10u64),
            call_data: Bytes::default(),
            approval_count: 1,
            created_at_seq: 0,
        };
        assert_eq!(tx.status(2), TxStatus::Initiated);
        assert!(!tx.is_executable(2));

        tx.approval_count = 2;
        assert_eq!(tx.status(2), TxStatus::Approved);
        assert!(tx.is_executable(2));
    }
}
