use crate::selectors::{
    account_execute_selector, execute_tx_selector, initiate_tx_selector, selector_of,
    sign_tx_selector, Selector,
};
use ethers::abi::{self, ParamType, Token};
use semaphore_msa_types::{
    Address, Bytes, MsaError, MsaResult, SemaphoreProof, H256, PROOF_POINTS, U256,
};

/// ERC-7579 call type byte for a single execution.
pub const CALLTYPE_SINGLE: u8 = 0x00;

/// A decoded call into one of the executor's three gated entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutorCall {
    InitiateTx {
        target: Address,
        value: U256,
        call_data: Bytes,
        proof: SemaphoreProof,
        execute: bool,
    },
    SignTx {
        tx_hash: H256,
        proof: SemaphoreProof,
        execute: bool,
    },
    ExecuteTx {
        tx_hash: H256,
    },
}

fn proof_param() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::Uint(256),
        ParamType::FixedArray(Box::new(ParamType::Uint(256)), PROOF_POINTS),
    ])
}

fn proof_token(proof: &SemaphoreProof) -> Token {
    Token::Tuple(vec![
        Token::Uint(U256::from(proof.merkle_tree_depth)),
        Token::Uint(proof.merkle_tree_root),
        Token::Uint(proof.nullifier),
        Token::Uint(proof.message),
        Token::Uint(proof.scope),
        Token::FixedArray(proof.points.iter().map(|p| Token::Uint(*p)).collect()),
    ])
}

fn abi_err(what: &str) -> MsaError {
    MsaError::Abi(format!("malformed {}", what))
}

fn token_uint(token: Token, what: &str) -> MsaResult<U256> {
    token.into_uint().ok_or_else(|| abi_err(what))
}

fn proof_from_token(token: Token) -> MsaResult<SemaphoreProof> {
    let mut fields = token.into_tuple().ok_or_else(|| abi_err("proof"))?.into_iter();
    let mut next = |what: &str| fields.next().ok_or_else(|| abi_err(what));

    let depth = token_uint(next("depth")?, "depth")?;
    if depth > U256::from(u32::MAX) {
        return Err(MsaError::Abi("proof depth out of range".into()));
    }
    let merkle_tree_root = token_uint(next("root")?, "root")?;
    let nullifier = token_uint(next("nullifier")?, "nullifier")?;
    let message = token_uint(next("message")?, "message")?;
    let scope = token_uint(next("scope")?, "scope")?;
    let raw_points = next("points")?
        .into_fixed_array()
        .ok_or_else(|| abi_err("points"))?;
    if raw_points.len() != PROOF_POINTS {
        return Err(abi_err("points"));
    }

    let mut points = [U256::zero(); PROOF_POINTS];
    for (slot, token) in points.iter_mut().zip(raw_points) {
        *slot = token_uint(token, "point")?;
    }

    Ok(SemaphoreProof {
        merkle_tree_depth: depth.as_u32(),
        merkle_tree_root,
        nullifier,
        message,
        scope,
        points,
    })
}

fn with_selector(selector: Selector, tokens: &[Token]) -> Bytes {
    let mut out = selector.to_vec();
    out.extend(abi::encode(tokens));
    Bytes::from(out)
}

fn h256_from_token(token: Token) -> MsaResult<H256> {
    let bytes = token.into_fixed_bytes().ok_or_else(|| abi_err("tx hash"))?;
    if bytes.len() != 32 {
        return Err(abi_err("tx hash"));
    }
    Ok(H256::from_slice(&bytes))
}

impl ExecutorCall {
    pub fn selector(&self) -> Selector {
        match self {
            ExecutorCall::InitiateTx { .. } => initiate_tx_selector(),
            ExecutorCall::SignTx { .. } => sign_tx_selector(),
            ExecutorCall::ExecuteTx { .. } => execute_tx_selector(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutorCall::InitiateTx { .. } => "initiateTx",
            ExecutorCall::SignTx { .. } => "signTx",
            ExecutorCall::ExecuteTx { .. } => "executeTx",
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            ExecutorCall::InitiateTx { target, value, call_data, proof, execute } => with_selector(
                initiate_tx_selector(),
                &[
                    Token::Address(*target),
                    Token::Uint(*value),
                    Token::Bytes(call_data.to_vec()),
                    proof_token(proof),
                    Token::Bool(*execute),
                ],
            ),
            ExecutorCall::SignTx { tx_hash, proof, execute } => with_selector(
                sign_tx_selector(),
                &[
                    Token::FixedBytes(tx_hash.as_bytes().to_vec()),
                    proof_token(proof),
                    Token::Bool(*execute),
                ],
            ),
            ExecutorCall::ExecuteTx { tx_hash } => with_selector(
                execute_tx_selector(),
                &[Token::FixedBytes(tx_hash.as_bytes().to_vec())],
            ),
        }
    }

    pub fn decode(data: &[u8]) -> MsaResult<Self> {
        let selector = selector_of(data).ok_or_else(|| abi_err("selector"))?;
        let args = &data[4..];

        if selector == initiate_tx_selector() {
            let tokens = abi::decode(
                &[
                    ParamType::Address,
                    ParamType::Uint(256),
                    ParamType::Bytes,
                    proof_param(),
                    ParamType::Bool,
                ],
                args,
            )
            .map_err(|e| MsaError::Abi(e.to_string()))?;
            let mut it = tokens.into_iter();
            let target = it.next().and_then(Token::into_address).ok_or_else(|| abi_err("target"))?;
            let value = it.next().and_then(Token::into_uint).ok_or_else(|| abi_err("value"))?;
            let call_data = it.next().and_then(Token::into_bytes).ok_or_else(|| abi_err("call data"))?;
            let proof = proof_from_token(it.next().ok_or_else(|| abi_err("proof"))?)?;
            let execute = it.next().and_then(Token::into_bool).ok_or_else(|| abi_err("execute flag"))?;
            return Ok(ExecutorCall::InitiateTx {
                target,
                value,
                call_data: Bytes::from(call_data),
                proof,
                execute,
            });
        }

        if selector == sign_tx_selector() {
            let tokens = abi::decode(
                &[ParamType::FixedBytes(32), proof_param(), ParamType::Bool],
                args,
            )
            .map_err(|e| MsaError::Abi(e.to_string()))?;
            let mut it = tokens.into_iter();
            let tx_hash = h256_from_token(it.next().ok_or_else(|| abi_err("tx hash"))?)?;
            let proof = proof_from_token(it.next().ok_or_else(|| abi_err("proof"))?)?;
            let execute = it.next().and_then(Token::into_bool).ok_or_else(|| abi_err("execute flag"))?;
            return Ok(ExecutorCall::SignTx { tx_hash, proof, execute });
        }

        if selector == execute_tx_selector() {
            let tokens = abi::decode(&[ParamType::FixedBytes(32)], args)
                .map_err(|e| MsaError::Abi(e.to_string()))?;
            let tx_hash = h256_from_token(tokens.into_iter().next().ok_or_else(|| abi_err("tx hash"))?)?;
            return Ok(ExecutorCall::ExecuteTx { tx_hash });
        }

        Err(MsaError::Abi(format!("unknown selector 0x{}", hex::encode(selector))))
    }
}

/// Single call carried inside the account's `execute(bytes32,bytes)` wrapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountExecution {
    pub target: Address,
    pub value: U256,
    pub call_data: Bytes,
}

impl AccountExecution {
    pub fn new(target: Address, value: U256, call_data: Bytes) -> Self {
        Self { target, value, call_data }
    }

    /// `execute(mode, abi.encodePacked(target, value, callData))` with a
    /// single-call mode.
    pub fn encode(&self) -> Bytes {
        let mut packed = Vec::with_capacity(20 + 32 + self.call_data.len());
        packed.extend_from_slice(self.target.as_bytes());
        let mut word = [0u8; 32];
        self.value.to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        packed.extend_from_slice(&self.call_data);

        let mode = [CALLTYPE_SINGLE; 32];
        with_selector(
            account_execute_selector(),
            &[Token::FixedBytes(mode.to_vec()), Token::Bytes(packed)],
        )
    }

    /// Rejects anything other than a single-call `execute` wrapper.
    pub fn decode(data: &[u8]) -> MsaResult<Self> {
        let selector = selector_of(data)
            .ok_or_else(|| MsaError::InvalidTargetCallData("call data shorter than a selector".into()))?;
        if selector != account_execute_selector() {
            return Err(MsaError::InvalidTargetCallData(format!(
                "account selector 0x{} is not execute",
                hex::encode(selector)
            )));
        }

        let tokens = abi::decode(&[ParamType::FixedBytes(32), ParamType::Bytes], &data[4..])
            .map_err(|e| MsaError::InvalidTargetCallData(e.to_string()))?;
        let mut it = tokens.into_iter();
        let mode = it
            .next()
            .and_then(Token::into_fixed_bytes)
            .ok_or_else(|| MsaError::InvalidTargetCallData("missing mode".into()))?;
        let packed = it
            .next()
            .and_then(Token::into_bytes)
            .ok_or_else(|| MsaError::InvalidTargetCallData("missing execution data".into()))?;

        if mode.first().copied() != Some(CALLTYPE_SINGLE) {
            return Err(MsaError::InvalidTargetCallData("only single executions are allowed".into()));
        }
        if packed.len() < 52 {
            return Err(MsaError::InvalidTargetCallData("execution data too short".into()));
        }

        Ok(Self {
            target: Address::from_slice(&packed[..20]),
            value: U256::from_big_endian(&packed[20..52]),
            call_data: Bytes::from(packed[52..].to_vec()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> SemaphoreProof {
        let mut points = [U256::zero(); PROOF_POINTS];
        for (i, p) in points.iter_mut().enumerate() {
            *p = U256::from(i as u64 + 100);
        }
        SemaphoreProof {
            merkle_tree_depth: 20,
            merkle_tree_root: U256::from(11u64),
            nullifier: U256::from(22u64),
            message: U256::from(33u64),
            scope: U256::from(44u64),
            points,
        }
    }

    #[test]
    fn test_initiate_call_codec() {
        let call = ExecutorCall::InitiateTx {
            target: Address::repeat_byte(0x33),
            value: U256::from(5u64),
            call_data: Bytes::from(vec![1, 2, 3]),
            proof: sample_proof(),
            execute: true,
        };
        let encoded = call.encode();
        assert_eq!(&encoded[..4], &initiate_tx_selector());
        assert_eq!(ExecutorCall::decode(&encoded).unwrap(), call);
    }

    #[test]
    fn test_sign_and_execute_codec() {
        let sign = ExecutorCall::SignTx {
            tx_hash: H256::repeat_byte(0x07),
            proof: sample_proof(),
            execute: false,
        };
        assert_eq!(ExecutorCall::decode(&sign.encode()).unwrap(), sign);

        let exec = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(0x08) };
        assert_eq!(exec.encode().len(), 4 + 32);
        assert_eq!(ExecutorCall::decode(&exec.encode()).unwrap(), exec);
    }

    #[test]
    fn test_unknown_selector_rejected() {
        let data = [0xa9, 0x05, 0x9c, 0xbb, 0, 0];
        assert!(matches!(ExecutorCall::decode(&data), Err(MsaError::Abi(_))));
    }

    #[test]
    fn test_truncated_call_rejected() {
        let encoded = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(1) }.encode();
        assert!(ExecutorCall::decode(&encoded[..20]).is_err());
    }

    #[test]
    fn test_account_execution_codec() {
        let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(9) }.encode();
        let exec = AccountExecution::new(Address::repeat_byte(0xee), U256::zero(), inner.clone());
        let decoded = AccountExecution::decode(&exec.encode()).unwrap();
        assert_eq!(decoded.target, Address::repeat_byte(0xee));
        assert_eq!(decoded.call_data, inner);
    }

    #[test]
    fn test_account_execution_rejects_batch_mode() {
        let mut packed = Address::repeat_byte(0xee).as_bytes().to_vec();
        packed.extend_from_slice(&[0u8; 32]);
        let mut mode = [0u8; 32];
        mode[0] = 0x01;
        let data = with_selector(
            account_execute_selector(),
            &[Token::FixedBytes(mode.to_vec()), Token::Bytes(packed)],
        );
        assert!(matches!(
            AccountExecution::decode(&data),
            Err(MsaError::InvalidTargetCallData(_))
        ));
    }

    #[test]
    fn test_account_execution_rejects_other_selector() {
        let data = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
        assert!(matches!(
            AccountExecution::decode(&data),
            Err(MsaError::InvalidTargetCallData(_))
        ));
    }
}
