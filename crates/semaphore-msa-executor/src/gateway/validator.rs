use super::classify::{classify, GatedCall};
use super::AuthorizationGateway;
use crate::collaborators::MemberPublicKey;
use crate::module::DispatchOutcome;
use ethers::abi::{self, Token};
use semaphore_msa_crypto::keccak256;
use semaphore_msa_types::{Address, Bytes, Commitment, MsaError, MsaResult, H256, U256};
use tracing::{debug, warn};

pub const PUBLIC_KEY_SIZE: usize = 64;

/// `R8` point plus `S` scalar.
pub const MEMBER_SIGNATURE_SIZE: usize = 96;

/// The part of an account-abstraction user operation the gateway reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    pub call_data: Bytes,
    pub signature: Bytes,
}

impl UserOperation {
    /// Digest members sign in the in-process transport:
    /// `keccak256(abi.encode(sender, nonce, keccak256(callData), chainId))`.
    pub fn hash(&self, chain_id: u64) -> H256 {
        let encoded = abi::encode(&[
            Token::Address(self.sender),
            Token::Uint(self.nonce),
            Token::FixedBytes(keccak256(&self.call_data).to_vec()),
            Token::Uint(U256::from(chain_id)),
        ]);
        H256::from(keccak256(&encoded))
    }
}

/// `publicKey ‖ signature` carried in the user operation's signature field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberCredential {
    pub public_key: MemberPublicKey,
    pub signature: Vec<u8>,
}

impl MemberCredential {
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(PUBLIC_KEY_SIZE + self.signature.len());
        let mut word = [0u8; 32];
        for coordinate in &self.public_key {
            coordinate.to_big_endian(&mut word);
            out.extend_from_slice(&word);
        }
        out.extend_from_slice(&self.signature);
        Bytes::from(out)
    }

    pub fn decode(data: &[u8]) -> MsaResult<Self> {
        if data.len() != PUBLIC_KEY_SIZE + MEMBER_SIGNATURE_SIZE {
            return Err(MsaError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_SIZE + MEMBER_SIGNATURE_SIZE,
                data.len()
            )));
        }
        Ok(Self {
            public_key: [
                U256::from_big_endian(&data[..32]),
                U256::from_big_endian(&data[32..PUBLIC_KEY_SIZE]),
            ],
            signature: data[PUBLIC_KEY_SIZE..].to_vec(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid { call: GatedCall, member: Commitment },
    /// Well-formed credential of a member, but the signature does not verify.
    SignatureFailed,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}

impl AuthorizationGateway {
    /// Classifies the operation, then checks the member credential against
    /// the account's roster and `op_hash`.
    pub async fn validate_user_op(&self, op: &UserOperation, op_hash: H256) -> MsaResult<ValidationOutcome> {
        let account = op.sender;
        if !self.is_installed(account).await {
            return Err(MsaError::NotInitialized { account });
        }

        let call = classify(account, self.module.address(), &op.call_data)?;
        debug!("Classified {} for {:?}", call.op, account);

        let credential = MemberCredential::decode(&op.signature)?;
        let member = self.signatures.commitment_of(&credential.public_key);
        if !self.module.has_member(account, member).await? {
            return Err(MsaError::MemberNotExists {
                account,
                commitment: member,
            });
        }

        if !self
            .signatures
            .verify(&credential.public_key, &op_hash, &credential.signature)
        {
            warn!("Signature check failed for member {} of {:?}", member, account);
            return Ok(ValidationOutcome::SignatureFailed);
        }

        Ok(ValidationOutcome::Valid { call, member })
    }

    /// Validates and, when valid, runs the gated executor call.
    pub async fn handle_user_op(&self, op: &UserOperation, op_hash: H256) -> MsaResult<DispatchOutcome> {
        match self.validate_user_op(op, op_hash).await? {
            ValidationOutcome::Valid { call, .. } => {
                self.module.dispatch(op.sender, &call.call_data).await
            }
            ValidationOutcome::SignatureFailed => Err(MsaError::InvalidSignature(
                "signature does not match member key".into(),
            )),
        }
    }
}
