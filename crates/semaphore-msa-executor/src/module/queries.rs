use super::SemaphoreMsaModule;
use semaphore_msa_crypto::tx_hash;
use semaphore_msa_types::{
    AccountSnapshot, Address, Commitment, GroupId, MsaResult, PendingTransaction, TxStatus, H256,
    MODULE_NAME, MODULE_TYPE_EXECUTOR, MODULE_VERSION, U256,
};

impl SemaphoreMsaModule {
    pub fn name(&self) -> &'static str {
        MODULE_NAME
    }

    pub fn version(&self) -> &'static str {
        MODULE_VERSION
    }

    /// Only the executor module type is supported.
    pub fn is_module_type(&self, type_id: u64) -> bool {
        type_id == MODULE_TYPE_EXECUTOR
    }

    pub async fn is_initialized(&self, account: Address) -> bool {
        match self.lock_existing(account).await {
            Some(slot) => slot.state.is_some(),
            None => false,
        }
    }

    pub async fn threshold(&self, account: Address) -> MsaResult<u8> {
        self.read_state(account, |s| s.threshold).await
    }

    pub async fn group_id(&self, account: Address) -> MsaResult<GroupId> {
        self.read_state(account, |s| s.group_id).await
    }

    pub async fn sequence_number(&self, account: Address) -> MsaResult<u64> {
        self.read_state(account, |s| s.sequence.current()).await
    }

    pub async fn member_count(&self, account: Address) -> MsaResult<u8> {
        self.read_state(account, |s| s.roster.count()).await
    }

    /// Newest first.
    pub async fn members(&self, account: Address) -> MsaResult<Vec<Commitment>> {
        self.read_state(account, |s| s.roster.list()).await
    }

    pub async fn has_member(&self, account: Address, commitment: Commitment) -> MsaResult<bool> {
        self.read_state(account, |s| s.roster.contains(&commitment)).await
    }

    /// Removal witness for `commitment`, `None` when it is not a member.
    pub async fn predecessor_of(
        &self,
        account: Address,
        commitment: Commitment,
    ) -> MsaResult<Option<Commitment>> {
        self.read_state(account, |s| s.roster.predecessor_of(&commitment)).await
    }

    pub async fn pending_transaction(
        &self,
        account: Address,
        tx_hash: H256,
    ) -> MsaResult<PendingTransaction> {
        self.read_state(account, |s| s.ledger.get(&tx_hash).cloned())
            .await?
    }

    pub async fn tx_status(&self, account: Address, tx_hash: H256) -> MsaResult<TxStatus> {
        self.read_state(account, |s| s.ledger.get(&tx_hash).map(|tx| tx.status(s.threshold)))
            .await?
    }

    pub async fn pending_transactions(&self, account: Address) -> MsaResult<Vec<PendingTransaction>> {
        self.read_state(account, |s| s.ledger.list()).await
    }

    /// Hash the next `initiate_tx` with these arguments would produce; the
    /// scope members must prove against.
    pub async fn prepare_tx_hash(
        &self,
        account: Address,
        target: Address,
        value: U256,
        call_data: &[u8],
    ) -> MsaResult<H256> {
        self.read_state(account, |s| tx_hash(s.sequence.current(), target, value, call_data))
            .await
    }

    pub async fn is_nullifier_used(&self, account: Address, scope: H256, nullifier: U256) -> bool {
        match self.lock_existing(account).await {
            Some(slot) => slot.nullifiers.contains(&scope, &nullifier),
            None => false,
        }
    }

    pub async fn snapshot(&self, account: Address) -> AccountSnapshot {
        match self.lock_existing(account).await {
            Some(slot) => slot.snapshot(account),
            None => crate::account::AccountSlot::default().snapshot(account),
        }
    }

    pub async fn installed_accounts(&self) -> Vec<Address> {
        let slots: Vec<_> = self
            .accounts
            .read()
            .await
            .iter()
            .map(|(account, slot)| (*account, slot.clone()))
            .collect();

        let mut out = Vec::new();
        for (account, slot) in slots {
            if slot.lock().await.state.is_some() {
                out.push(account);
            }
        }
        out.sort();
        out
    }
}
