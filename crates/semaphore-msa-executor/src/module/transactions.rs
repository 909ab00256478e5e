use super::{installed, SemaphoreMsaModule};
use crate::account::AccountSlot;
use crate::config::NullifierRetention;
use crate::proofs::verify_approval;
use semaphore_msa_crypto::tx_hash;
use semaphore_msa_types::{
    Address, ApprovalReceipt, Bytes, ExecutionStatus, ModuleEvent, MsaError, MsaResult,
    PendingTransaction, SemaphoreProof, H256, U256,
};
use tracing::{info, warn};

impl SemaphoreMsaModule {
    /// Proposes a call from `account`, counting the proof as its first approval.
    pub async fn initiate_tx(
        &self,
        account: Address,
        target: Address,
        value: U256,
        call_data: Bytes,
        proof: &SemaphoreProof,
        auto_execute: bool,
    ) -> MsaResult<ApprovalReceipt> {
        let mut slot = self.lock_account(account).await?;
        let AccountSlot { state, nullifiers } = &mut *slot;
        let state = installed(state, account)?;

        if target.is_zero() {
            return Err(MsaError::InitiateTxWithNullAddress { account });
        }

        let seq = state.sequence.current();
        let tx_hash = tx_hash(seq, target, value, &call_data);

        verify_approval(
            self.registry.as_ref(),
            self.verifier.as_ref(),
            self.clock.as_ref(),
            state.group_id,
            tx_hash,
            proof,
        )
        .await?;

        state.ledger.check_new(&tx_hash)?;
        nullifiers.check(&tx_hash, &proof.nullifier)?;
        let mut next_sequence = state.sequence;
        next_sequence.advance(account)?;

        nullifiers.consume(tx_hash, proof.nullifier)?;
        state.ledger.insert(PendingTransaction {
            tx_hash,
            target,
            value,
            call_data,
            approval_count: 1,
            created_at_seq: seq,
        })?;
        state.sequence = next_sequence;

        self.emit(ModuleEvent::TxInitiated {
            account,
            seq,
            tx_hash,
            approval_count: 1,
        });

        let execution = self.maybe_execute(account, &mut slot, tx_hash, auto_execute).await;
        Ok(ApprovalReceipt {
            tx_hash,
            approval_count: 1,
            execution,
        })
    }

    /// Adds one anonymous approval to a pending transaction.
    pub async fn sign_tx(
        &self,
        account: Address,
        tx_hash: H256,
        proof: &SemaphoreProof,
        auto_execute: bool,
    ) -> MsaResult<ApprovalReceipt> {
        let mut slot = self.lock_account(account).await?;
        let AccountSlot { state, nullifiers } = &mut *slot;
        let state = installed(state, account)?;

        state.ledger.get(&tx_hash)?;

        verify_approval(
            self.registry.as_ref(),
            self.verifier.as_ref(),
            self.clock.as_ref(),
            state.group_id,
            tx_hash,
            proof,
        )
        .await?;

        nullifiers.check(&tx_hash, &proof.nullifier)?;
        // a member removed after proving against an older root still verifies
        let member_count = state.roster.count();
        if state.ledger.get(&tx_hash)?.approval_count >= member_count {
            return Err(MsaError::ApprovalCountExceedsMembers {
                account,
                tx_hash,
                member_count,
            });
        }

        nullifiers.consume(tx_hash, proof.nullifier)?;
        let approval_count = state.ledger.approve(&tx_hash, member_count)?;

        self.emit(ModuleEvent::TxSigned {
            account,
            tx_hash,
            approval_count,
        });

        let execution = self.maybe_execute(account, &mut slot, tx_hash, auto_execute).await;
        Ok(ApprovalReceipt {
            tx_hash,
            approval_count,
            execution,
        })
    }

    /// Runs an approved transaction. On a failed call the entry stays
    /// pending and the call may be retried.
    pub async fn execute_tx(&self, account: Address, tx_hash: H256) -> MsaResult<Bytes> {
        let mut slot = self.lock_account(account).await?;
        self.run_execution(account, &mut slot, tx_hash).await
    }

    async fn maybe_execute(
        &self,
        account: Address,
        slot: &mut AccountSlot,
        tx_hash: H256,
        auto_execute: bool,
    ) -> ExecutionStatus {
        if !auto_execute {
            return ExecutionStatus::NotRequested;
        }
        let ready = slot
            .state
            .as_ref()
            .and_then(|state| {
                state
                    .ledger
                    .get(&tx_hash)
                    .ok()
                    .map(|tx| tx.is_executable(state.threshold))
            })
            .unwrap_or(false);
        if !ready {
            return ExecutionStatus::Deferred;
        }

        match self.run_execution(account, slot, tx_hash).await {
            Ok(return_data) => ExecutionStatus::Executed { return_data },
            Err(MsaError::ExecuteTxFailure { reason, .. }) => ExecutionStatus::Failed { reason },
            Err(e) => ExecutionStatus::Failed { reason: e.to_string() },
        }
    }

    async fn run_execution(
        &self,
        account: Address,
        slot: &mut AccountSlot,
        tx_hash: H256,
    ) -> MsaResult<Bytes> {
        let AccountSlot { state, nullifiers } = slot;
        let state = installed(state, account)?;

        let tx = state.ledger.get(&tx_hash)?.clone();
        if !tx.is_executable(state.threshold) {
            return Err(MsaError::ThresholdNotReach {
                account,
                threshold: state.threshold,
                approvals: tx.approval_count,
            });
        }

        let return_data = match self
            .executor
            .call(account, tx.target, tx.value, &tx.call_data)
            .await
        {
            Ok(data) => data,
            Err(revert) => {
                warn!("Execution of {:?} for {:?} failed: {}", tx_hash, account, revert);
                self.emit(ModuleEvent::TxExecutionFailed {
                    account,
                    tx_hash,
                    reason: revert.reason.clone(),
                });
                return Err(MsaError::ExecuteTxFailure {
                    account,
                    target: tx.target,
                    value: tx.value,
                    call_data: tx.call_data,
                    reason: revert.reason,
                });
            }
        };

        state.ledger.remove(&tx_hash)?;
        if self.config.nullifier_retention == NullifierRetention::PruneOnExecute {
            let pruned = nullifiers.prune_scope(&tx_hash);
            info!("Pruned {} nullifiers for executed transaction {:?}", pruned, tx_hash);
        }

        self.emit(ModuleEvent::TxExecuted { account, tx_hash });
        Ok(return_data)
    }
}
