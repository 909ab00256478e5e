use super::SemaphoreMsaModule;
use semaphore_msa_crypto::ExecutorCall;
use semaphore_msa_types::{Address, ApprovalReceipt, Bytes, MsaResult, H256};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    Initiated(ApprovalReceipt),
    Signed(ApprovalReceipt),
    Executed { tx_hash: H256, return_data: Bytes },
}

impl DispatchOutcome {
    pub fn tx_hash(&self) -> H256 {
        match self {
            DispatchOutcome::Initiated(receipt) | DispatchOutcome::Signed(receipt) => receipt.tx_hash,
            DispatchOutcome::Executed { tx_hash, .. } => *tx_hash,
        }
    }
}

impl SemaphoreMsaModule {
    /// Decodes ABI call data for one of the three entry points and runs it.
    pub async fn dispatch(&self, account: Address, call_data: &[u8]) -> MsaResult<DispatchOutcome> {
        let call = ExecutorCall::decode(call_data)?;
        debug!("Dispatching {} for {:?}", call.name(), account);

        match call {
            ExecutorCall::InitiateTx { target, value, call_data, proof, execute } => self
                .initiate_tx(account, target, value, call_data, &proof, execute)
                .await
                .map(DispatchOutcome::Initiated),
            ExecutorCall::SignTx { tx_hash, proof, execute } => self
                .sign_tx(account, tx_hash, &proof, execute)
                .await
                .map(DispatchOutcome::Signed),
            ExecutorCall::ExecuteTx { tx_hash } => {
                let return_data = self.execute_tx(account, tx_hash).await?;
                Ok(DispatchOutcome::Executed { tx_hash, return_data })
            }
        }
    }
}
