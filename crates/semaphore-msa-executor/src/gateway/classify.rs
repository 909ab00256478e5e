use semaphore_msa_crypto::{
    execute_tx_selector, initiate_tx_selector, selector_of, sign_tx_selector, AccountExecution,
    Selector,
};
use semaphore_msa_types::{Address, Bytes, MsaError, MsaResult};
use serde::{Deserialize, Serialize};

/// The only operations a bare member credential may authorize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedOp {
    InitiateTx,
    SignTx,
    ExecuteTx,
}

impl AllowedOp {
    pub fn from_selector(selector: Selector) -> Option<Self> {
        if selector == initiate_tx_selector() {
            Some(AllowedOp::InitiateTx)
        } else if selector == sign_tx_selector() {
            Some(AllowedOp::SignTx)
        } else if selector == execute_tx_selector() {
            Some(AllowedOp::ExecuteTx)
        } else {
            None
        }
    }

    pub fn selector(&self) -> Selector {
        match self {
            AllowedOp::InitiateTx => initiate_tx_selector(),
            AllowedOp::SignTx => sign_tx_selector(),
            AllowedOp::ExecuteTx => execute_tx_selector(),
        }
    }
}

impl std::fmt::Display for AllowedOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllowedOp::InitiateTx => write!(f, "initiateTx"),
            AllowedOp::SignTx => write!(f, "signTx"),
            AllowedOp::ExecuteTx => write!(f, "executeTx"),
        }
    }
}

/// An account call that passed classification, with the executor call data
/// it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatedCall {
    pub op: AllowedOp,
    pub executor: Address,
    pub call_data: Bytes,
}

/// Decides from the target and selector alone whether a call may be
/// authorized by a member credential.
pub fn authorize(
    account: Address,
    executor: Address,
    target: Address,
    selector: Option<Selector>,
) -> MsaResult<AllowedOp> {
    if target.is_zero() {
        return Err(MsaError::InvalidTargetAddress { target });
    }
    if target != executor {
        return Err(MsaError::NotValidSemaphoreExecutor { account, target });
    }
    let selector = selector
        .ok_or_else(|| MsaError::InvalidTargetCallData("executor call data has no selector".into()))?;
    AllowedOp::from_selector(selector).ok_or_else(|| {
        MsaError::InvalidTargetCallData(format!(
            "selector 0x{} is not a gated executor entry point",
            hex::encode(selector)
        ))
    })
}

/// Stage one: unwraps the account's `execute` call and checks what it
/// targets. No credential is looked at here.
pub fn classify(account: Address, executor: Address, account_call_data: &[u8]) -> MsaResult<GatedCall> {
    let execution = AccountExecution::decode(account_call_data)?;
    let op = authorize(
        account,
        executor,
        execution.target,
        selector_of(&execution.call_data),
    )?;
    if !execution.value.is_zero() {
        return Err(MsaError::InvalidTargetCallData(format!(
            "{} must not carry value",
            op
        )));
    }
    Ok(GatedCall {
        op,
        executor: execution.target,
        call_data: execution.call_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use semaphore_msa_crypto::{selector, ExecutorCall};
    use semaphore_msa_types::{H256, U256};

    fn account() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn executor() -> Address {
        Address::repeat_byte(0xee)
    }

    fn wrap(target: Address, value: U256, inner: Bytes) -> Bytes {
        AccountExecution::new(target, value, inner).encode()
    }

    #[test]
    fn test_allows_gated_calls() {
        let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(1) }.encode();
        let gated = classify(account(), executor(), &wrap(executor(), U256::zero(), inner.clone())).unwrap();
        assert_eq!(gated.op, AllowedOp::ExecuteTx);
        assert_eq!(gated.call_data, inner);
    }

    #[test]
    fn test_rejects_zero_target() {
        let inner = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
        assert!(matches!(
            classify(account(), executor(), &wrap(Address::zero(), U256::zero(), inner)),
            Err(MsaError::InvalidTargetAddress { .. })
        ));
    }

    #[test]
    fn test_rejects_foreign_target() {
        let inner = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
        assert!(matches!(
            classify(account(), executor(), &wrap(Address::repeat_byte(0x01), U256::zero(), inner)),
            Err(MsaError::NotValidSemaphoreExecutor { .. })
        ));
    }

    #[test]
    fn test_rejects_other_selectors() {
        let mut inner = selector("transfer(address,uint256)").to_vec();
        inner.extend_from_slice(&[0u8; 64]);
        assert!(matches!(
            classify(account(), executor(), &wrap(executor(), U256::zero(), Bytes::from(inner))),
            Err(MsaError::InvalidTargetCallData(_))
        ));
        assert!(matches!(
            classify(account(), executor(), &wrap(executor(), U256::zero(), Bytes::from(vec![1, 2]))),
            Err(MsaError::InvalidTargetCallData(_))
        ));
    }

    #[test]
    fn test_rejects_value() {
        let inner = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
        assert!(matches!(
            classify(account(), executor(), &wrap(executor(), U256::one(), inner)),
            Err(MsaError::InvalidTargetCallData(_))
        ));
    }

    #[test]
    fn test_rejects_non_execute_wrapper() {
        assert!(matches!(
            classify(account(), executor(), &[0xde, 0xad]),
            Err(MsaError::InvalidTargetCallData(_))
        ));
    }
}
