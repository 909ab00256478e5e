use crate::commitment::Commitment;
use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// One event per state transition, enough to rebuild account state off-line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ModuleEvent {
    ModuleInstalled {
        account: Address,
        group_id: U256,
        threshold: u8,
        member_count: u8,
    },
    ModuleUninstalled {
        account: Address,
    },
    MembersAdded {
        account: Address,
        commitments: Vec<Commitment>,
        member_count: u8,
    },
    MemberRemoved {
        account: Address,
        commitment: Commitment,
        member_count: u8,
    },
    ThresholdSet {
        account: Address,
        threshold: u8,
    },
    TxInitiated {
        account: Address,
        seq: u64,
        tx_hash: H256,
        approval_count: u8,
    },
    TxSigned {
        account: Address,
        tx_hash: H256,
        approval_count: u8,
    },
    TxExecuted {
        account: Address,
        tx_hash: H256,
    },
    TxExecutionFailed {
        account: Address,
        tx_hash: H256,
        reason: String,
    },
    GatewayInstalled {
        account: Address,
    },
    GatewayUninstalled {
        account: Address,
    },
}

impl ModuleEvent {
    pub fn account(&self) -> Address {
        match self {
            ModuleEvent::ModuleInstalled { account, .. }
            | ModuleEvent::ModuleUninstalled { account }
            | ModuleEvent::MembersAdded { account, .. }
            | ModuleEvent::MemberRemoved { account, .. }
            | ModuleEvent::ThresholdSet { account, .. }
            | ModuleEvent::TxInitiated { account, .. }
            | ModuleEvent::TxSigned { account, .. }
            | ModuleEvent::TxExecuted { account, .. }
            | ModuleEvent::TxExecutionFailed { account, .. }
            | ModuleEvent::GatewayInstalled { account }
            | ModuleEvent::GatewayUninstalled { account } => *account,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModuleEvent::ModuleInstalled { .. } => "module_installed",
            ModuleEvent::ModuleUninstalled { .. } => "module_uninstalled",
            ModuleEvent::MembersAdded { .. } => "members_added",
            ModuleEvent::MemberRemoved { .. } => "member_removed",
            ModuleEvent::ThresholdSet { .. } => "threshold_set",
            ModuleEvent::TxInitiated { .. } => "tx_initiated",
            ModuleEvent::TxSigned { .. } => "tx_signed",
            ModuleEvent::TxExecuted { .. } => "tx_executed",
            ModuleEvent::TxExecutionFailed { .. } => "tx_execution_failed",
            ModuleEvent::GatewayInstalled { .. } => "gateway_installed",
            ModuleEvent::GatewayUninstalled { .. } => "gateway_uninstalled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_is_tagged() {
        let event = ModuleEvent::ThresholdSet {
            account: Address::repeat_byte(0x01),
            threshold: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "threshold_set");
        assert_eq!(json["threshold"], 2);
        assert_eq!(event.name(), "threshold_set");
    }
}
