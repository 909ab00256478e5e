use crate::collaborators::{CallExecutor, CallRevert};
use async_trait::async_trait;
use semaphore_msa_types::{Address, Bytes, U256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub account: Address,
    pub target: Address,
    pub value: U256,
    pub call_data: Bytes,
}

/// Native-balance ledger standing in for the chain. Moves `value` from the
/// account to the target and echoes the call data back as return data.
#[derive(Default)]
pub struct BalanceCallExecutor {
    balances: Arc<RwLock<HashMap<Address, U256>>>,
    reverting: Arc<RwLock<HashSet<Address>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl BalanceCallExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fund(&self, address: Address, amount: U256) {
        let mut balances = self.balances.write().await;
        let entry = balances.entry(address).or_default();
        *entry = entry.saturating_add(amount);
    }

    pub async fn balance_of(&self, address: Address) -> U256 {
        self.balances.read().await.get(&address).copied().unwrap_or_default()
    }

    pub async fn set_reverting(&self, target: Address, reverting: bool) {
        let mut set = self.reverting.write().await;
        if reverting {
            set.insert(target);
        } else {
            set.remove(&target);
        }
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl CallExecutor for BalanceCallExecutor {
    async fn call(
        &self,
        account: Address,
        target: Address,
        value: U256,
        call_data: &Bytes,
    ) -> Result<Bytes, CallRevert> {
        if self.reverting.read().await.contains(&target) {
            return Err(CallRevert::new(format!("target {:?} reverted", target)));
        }

        {
            let mut balances = self.balances.write().await;
            let available = balances.get(&account).copied().unwrap_or_default();
            if available < value {
                return Err(CallRevert::new(format!(
                    "insufficient balance: have {}, need {}",
                    available, value
                )));
            }
            balances.insert(account, available - value);
            let to = balances.entry(target).or_default();
            *to = to.saturating_add(value);
        }

        self.calls.write().await.push(RecordedCall {
            account,
            target,
            value,
            call_data: call_data.clone(),
        });
        Ok(call_data.clone())
    }
}
