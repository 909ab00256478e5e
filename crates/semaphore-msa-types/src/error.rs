use crate::commitment::Commitment;
use ethers::types::{Address, Bytes, H256, U256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsaError {
    #[error("Module already initialized for account {account:?}")]
    ModuleAlreadyInitialized { account: Address },

    #[error("Module not initialized for account {account:?}")]
    NotInitialized { account: Address },

    #[error("Invalid install data: {0}")]
    InvalidInstallData(String),

    #[error("Invalid threshold {threshold} for account {account:?}")]
    InvalidThreshold { account: Address, threshold: u8 },

    #[error("Commitments are not unique")]
    CommitmentsNotUnique,

    #[error("Commitment cannot be zero")]
    LeafCannotBeZero,

    #[error("Invalid commitment {commitment} for account {account:?}")]
    InvalidCommitment { account: Address, commitment: Commitment },

    #[error("Commitment {commitment} is not in the snark scalar field")]
    LeafGreaterThanSnarkScalarField { commitment: Commitment },

    #[error("Maximum member count reached for account {account:?}")]
    MaxMemberReached { account: Address },

    #[error("Commitment {commitment} is already a member of account {account:?}")]
    IsMemberAlready { account: Address, commitment: Commitment },

    #[error("Commitment {commitment} is not a member of account {account:?}")]
    MemberNotExists { account: Address, commitment: Commitment },

    #[error("Predecessor {predecessor} does not point at {commitment} for account {account:?}")]
    InvalidRemovalWitness {
        account: Address,
        predecessor: Commitment,
        commitment: Commitment,
    },

    #[error("Member count would drop below threshold for account {account:?}")]
    MemberCntReachesThreshold { account: Address },

    #[error("Cannot initiate a transaction to the zero address for account {account:?}")]
    InitiateTxWithNullAddress { account: Address },

    #[error("Transaction {tx_hash:?} has already been initiated for account {account:?}")]
    TxHasBeenInitiated { account: Address, tx_hash: H256 },

    #[error("Transaction {tx_hash:?} not found for account {account:?}")]
    TxNotFound { account: Address, tx_hash: H256 },

    #[error("Transaction {tx_hash:?} already carries one approval per member ({member_count}) for account {account:?}")]
    ApprovalCountExceedsMembers {
        account: Address,
        tx_hash: H256,
        member_count: u8,
    },

    #[error("Threshold {threshold} not reached ({approvals} approvals) for account {account:?}")]
    ThresholdNotReach {
        account: Address,
        threshold: u8,
        approvals: u8,
    },

    #[error("Execution of call to {target:?} (value {value}) failed for account {account:?}: {reason}")]
    ExecuteTxFailure {
        account: Address,
        target: Address,
        value: U256,
        call_data: Bytes,
        reason: String,
    },

    #[error("Sequence number exhausted for account {account:?}")]
    SequenceOverflow { account: Address },

    #[error("Semaphore group {group_id} does not exist")]
    GroupDoesNotExist { group_id: U256 },

    #[error("Merkle tree depth {depth} is not supported")]
    MerkleTreeDepthIsNotSupported { depth: u32 },

    #[error("Merkle root {root} of group {group_id} has expired")]
    MerkleTreeRootIsExpired { group_id: U256, root: U256 },

    #[error("Merkle root {root} is not part of group {group_id}")]
    MerkleTreeRootIsNotPartOfTheGroup { group_id: U256, root: U256 },

    #[error("Invalid Semaphore proof")]
    InvalidProof,

    #[error("Nullifier {nullifier} already used for scope {scope:?}")]
    DuplicateNullifier { scope: H256, nullifier: U256 },

    #[error("Semaphore proof rejected: {reason}")]
    InvalidSemaphoreProof { reason: String },

    #[error("Invalid target address {target:?}")]
    InvalidTargetAddress { target: Address },

    #[error("Invalid target call data: {0}")]
    InvalidTargetCallData(String),

    #[error("Call target {target:?} is not the Semaphore executor for account {account:?}")]
    NotValidSemaphoreExecutor { account: Address, target: Address },

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Semaphore executor is not initialized for account {account:?}")]
    SemaphoreExecutorNotInitialized { account: Address },

    #[error("Group registry error: {0}")]
    GroupRegistry(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type MsaResult<T> = Result<T, MsaError>;

/// Broad classes of failure. Every class leaves module state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    StateConflict,
    Authorization,
    ExternalCall,
    Collaborator,
}

impl MsaError {
    pub fn kind(&self) -> ErrorKind {
        use MsaError::*;
        match self {
            InvalidInstallData(_)
            | InvalidThreshold { .. }
            | CommitmentsNotUnique
            | LeafCannotBeZero
            | InvalidCommitment { .. }
            | LeafGreaterThanSnarkScalarField { .. }
            | MaxMemberReached { .. }
            | InvalidRemovalWitness { .. }
            | InitiateTxWithNullAddress { .. }
            | MerkleTreeDepthIsNotSupported { .. }
            | InvalidTargetAddress { .. }
            | InvalidTargetCallData(_)
            | Abi(_)
            | Config(_) => ErrorKind::Validation,

            ModuleAlreadyInitialized { .. }
            | NotInitialized { .. }
            | IsMemberAlready { .. }
            | MemberNotExists { .. }
            | MemberCntReachesThreshold { .. }
            | TxHasBeenInitiated { .. }
            | TxNotFound { .. }
            | ApprovalCountExceedsMembers { .. }
            | SequenceOverflow { .. }
            | SemaphoreExecutorNotInitialized { .. } => ErrorKind::StateConflict,

            ThresholdNotReach { .. }
            | GroupDoesNotExist { .. }
            | MerkleTreeRootIsExpired { .. }
            | MerkleTreeRootIsNotPartOfTheGroup { .. }
            | InvalidProof
            | DuplicateNullifier { .. }
            | InvalidSemaphoreProof { .. }
            | NotValidSemaphoreExecutor { .. }
            | InvalidSignature(_) => ErrorKind::Authorization,

            ExecuteTxFailure { .. } => ErrorKind::ExternalCall,

            GroupRegistry(_) => ErrorKind::Collaborator,
        }
    }

    /// Whether the same call may succeed later without changing its inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MsaError::ExecuteTxFailure { .. }
                | MsaError::ThresholdNotReach { .. }
                | MsaError::GroupRegistry(_)
        )
    }
}
