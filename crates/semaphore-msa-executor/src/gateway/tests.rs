use super::*;
use crate::collaborators::GroupRegistry;
use crate::config::ModuleConfig;
use crate::memory::{DevEnvironment, DevIdentity, DevSignatureScheme, DevSigner};
use crate::module::DispatchOutcome;
use semaphore_msa_crypto::{selector, AccountExecution, ExecutorCall};
use semaphore_msa_types::{Bytes, Commitment, H256, U256};

const CHAIN_ID: u64 = 31_337;

struct Setup {
    env: DevEnvironment,
    gateway: AuthorizationGateway,
    account: Address,
    signers: Vec<DevSigner>,
    identities: Vec<DevIdentity>,
}

/// Roster starts with the signers' commitments. `identities` are proving
/// keys a test may add to the roster.
async fn setup() -> Setup {
    let env = DevEnvironment::new(1_000, 3_600);
    let module = Arc::new(
        SemaphoreMsaModule::new(Address::repeat_byte(0xee), ModuleConfig::default(), env.collaborators())
            .unwrap(),
    );
    let gateway = AuthorizationGateway::new(module.clone(), Arc::new(DevSignatureScheme));
    let account = Address::repeat_byte(0xaa);
    let signers: Vec<DevSigner> = (1..=3).map(DevSigner::from_seed).collect();
    let commitments: Vec<Commitment> = signers.iter().map(DevSigner::commitment).collect();

    module.install(account, 1, &commitments).await.unwrap();
    gateway.install(account).await.unwrap();
    env.executor.fund(account, U256::from(1_000u64)).await;

    Setup {
        env,
        gateway,
        account,
        signers,
        identities: (1..=3).map(DevIdentity::from_seed).collect(),
    }
}

fn user_op(sender: Address, inner: Bytes, target: Address) -> UserOperation {
    UserOperation {
        sender,
        nonce: U256::zero(),
        call_data: AccountExecution::new(target, U256::zero(), inner).encode(),
        signature: Bytes::default(),
    }
}

fn sign(op: &mut UserOperation, signer: &DevSigner) -> H256 {
    let hash = op.hash(CHAIN_ID);
    op.signature = signer.credential(&hash);
    hash
}

#[tokio::test]
async fn test_install_requires_executor() {
    let s = setup().await;
    let stranger = Address::repeat_byte(0x01);
    assert!(matches!(
        s.gateway.install(stranger).await,
        Err(MsaError::SemaphoreExecutorNotInitialized { .. })
    ));
    assert!(matches!(
        s.gateway.install(s.account).await,
        Err(MsaError::ModuleAlreadyInitialized { .. })
    ));
    assert!(matches!(
        s.gateway.uninstall(stranger).await,
        Err(MsaError::NotInitialized { .. })
    ));

    s.gateway.uninstall(s.account).await.unwrap();
    assert!(!s.gateway.is_installed(s.account).await);
}

#[tokio::test]
async fn test_valid_member_signature() {
    let s = setup().await;
    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(3) }.encode();
    let mut op = user_op(s.account, inner, s.gateway.module().address());
    let hash = sign(&mut op, &s.signers[1]);

    match s.gateway.validate_user_op(&op, hash).await.unwrap() {
        ValidationOutcome::Valid { call, member } => {
            assert_eq!(call.op, AllowedOp::ExecuteTx);
            assert_eq!(member, s.signers[1].commitment());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_signature_is_not_an_error() {
    let s = setup().await;
    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(3) }.encode();
    let mut op = user_op(s.account, inner, s.gateway.module().address());
    sign(&mut op, &s.signers[0]);

    let outcome = s.gateway.validate_user_op(&op, H256::repeat_byte(0x99)).await.unwrap();
    assert_eq!(outcome, ValidationOutcome::SignatureFailed);
    assert!(!outcome.is_valid());
}

#[tokio::test]
async fn test_non_member_rejected() {
    let s = setup().await;
    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(3) }.encode();
    let mut op = user_op(s.account, inner, s.gateway.module().address());
    let hash = sign(&mut op, &DevSigner::from_seed(99));

    assert!(matches!(
        s.gateway.validate_user_op(&op, hash).await,
        Err(MsaError::MemberNotExists { .. })
    ));
}

#[tokio::test]
async fn test_malformed_credential() {
    let s = setup().await;
    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::repeat_byte(3) }.encode();
    let mut op = user_op(s.account, inner, s.gateway.module().address());
    op.signature = Bytes::from(vec![0u8; 10]);

    assert!(matches!(
        s.gateway.validate_user_op(&op, H256::zero()).await,
        Err(MsaError::InvalidSignature(_))
    ));
}

#[tokio::test]
async fn test_classification_precedes_credentials() {
    let s = setup().await;
    let mut transfer = selector("transfer(address,uint256)").to_vec();
    transfer.extend_from_slice(&[0u8; 64]);

    let mut op = user_op(s.account, Bytes::from(transfer), s.gateway.module().address());
    let hash = sign(&mut op, &s.signers[0]);
    assert!(matches!(
        s.gateway.validate_user_op(&op, hash).await,
        Err(MsaError::InvalidTargetCallData(_))
    ));

    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
    let mut op = user_op(s.account, inner, Address::repeat_byte(0x77));
    let hash = sign(&mut op, &s.signers[0]);
    assert!(matches!(
        s.gateway.validate_user_op(&op, hash).await,
        Err(MsaError::NotValidSemaphoreExecutor { .. })
    ));
}

#[tokio::test]
async fn test_unknown_account() {
    let s = setup().await;
    let inner = ExecutorCall::ExecuteTx { tx_hash: H256::zero() }.encode();
    let op = user_op(Address::repeat_byte(0x10), inner, s.gateway.module().address());
    assert!(matches!(
        s.gateway.validate_user_op(&op, H256::zero()).await,
        Err(MsaError::NotInitialized { .. })
    ));
}

#[tokio::test]
async fn test_handle_user_op_runs_executor_call() {
    let s = setup().await;
    let module = s.gateway.module().clone();

    // a separate identity set signs the group proofs; add them to the roster
    let commitments: Vec<Commitment> = s.identities.iter().map(DevIdentity::commitment).collect();
    module.add_members(s.account, &commitments).await.unwrap();

    let recipient = Address::repeat_byte(0x42);
    let value = U256::from(25u64);
    let tx_hash = module
        .prepare_tx_hash(s.account, recipient, value, &[])
        .await
        .unwrap();
    let group = module.group_id(s.account).await.unwrap();
    let root = s.env.registry.current_root(group).await.unwrap();

    let inner = ExecutorCall::InitiateTx {
        target: recipient,
        value,
        call_data: Bytes::default(),
        proof: s.identities[0].prove(root, tx_hash),
        execute: true,
    }
    .encode();
    let mut op = user_op(s.account, inner, module.address());
    let hash = sign(&mut op, &s.signers[2]);

    match s.gateway.handle_user_op(&op, hash).await.unwrap() {
        DispatchOutcome::Initiated(receipt) => {
            assert_eq!(receipt.tx_hash, tx_hash);
            assert!(receipt.execution.is_executed());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(s.env.executor.balance_of(recipient).await, value);

    let mut forged = op.clone();
    forged.signature = Bytes::from(vec![0u8; PUBLIC_KEY_SIZE + MEMBER_SIGNATURE_SIZE]);
    assert!(matches!(
        s.gateway.handle_user_op(&forged, hash).await,
        Err(MsaError::MemberNotExists { .. })
    ));
}
