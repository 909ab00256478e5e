use super::commands::OutputFormat;
use crate::config::AppConfig;
use anyhow::Context;
use semaphore_msa_executor::memory::{DevEnvironment, DevIdentity};
use semaphore_msa_executor::{GroupRegistry, SemaphoreMsaModule};
use semaphore_msa_types::{
    Address, ApprovalReceipt, Bytes, Commitment, ExecutionStatus, GroupId, ModuleEvent, MsaError,
    TxStatus, H256, U256,
};
use serde::Serialize;
use tracing::info;

const MODULE_ADDRESS: Address = Address::repeat_byte(0xee);
const ACCOUNT: Address = Address::repeat_byte(0xaa);
const RECIPIENT: Address = Address::repeat_byte(0x42);

#[derive(Debug, Serialize)]
pub struct ApprovalStep {
    /// Index of the approving member in the simulated roster.
    pub member: usize,
    pub approval_count: u8,
    /// `None` once the transaction has been executed.
    pub status: Option<TxStatus>,
    pub execution: String,
}

impl ApprovalStep {
    fn new(member: usize, receipt: &ApprovalReceipt, status: Option<TxStatus>) -> Self {
        let execution = match &receipt.execution {
            ExecutionStatus::NotRequested => "not_requested".to_string(),
            ExecutionStatus::Deferred => "deferred".to_string(),
            ExecutionStatus::Executed { .. } => "executed".to_string(),
            ExecutionStatus::Failed { reason } => format!("failed: {}", reason),
        };
        Self {
            member,
            approval_count: receipt.approval_count,
            status,
            execution,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub module: String,
    pub account: Address,
    pub group_id: GroupId,
    pub members: Vec<Commitment>,
    pub threshold: u8,
    pub tx_hash: H256,
    /// A non-member proving against the current root was turned away.
    pub outsider_rejected: bool,
    pub approvals: Vec<ApprovalStep>,
    /// Whether a separate `executeTx` was needed after approvals.
    pub explicit_execute: bool,
    pub recipient_balance: U256,
    pub account_balance: U256,
    pub sequence_number: u64,
    pub nullifiers_consumed: usize,
    pub events: Vec<ModuleEvent>,
}

/// Installs the executor for a fresh account, collects `threshold`
/// approvals for a value transfer and executes it.
pub async fn run_simulation(config: &AppConfig, auto_execute: bool) -> anyhow::Result<SimulationReport> {
    let sim = &config.simulation;
    let start = sim
        .start_time
        .unwrap_or_else(|| u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default());

    let env = DevEnvironment::new(start, config.module.default_root_validity_secs);
    let module = SemaphoreMsaModule::new(MODULE_ADDRESS, config.module.clone(), env.collaborators())?;
    let mut events = module.subscribe();

    let identities: Vec<DevIdentity> = (1..=u64::from(sim.members)).map(DevIdentity::from_seed).collect();
    let commitments: Vec<Commitment> = identities.iter().map(DevIdentity::commitment).collect();

    env.executor.fund(ACCOUNT, U256::from(sim.funding)).await;
    let group_id = module.install(ACCOUNT, sim.threshold, &commitments).await?;
    info!("Simulated account {:?} installed with group {}", ACCOUNT, group_id);

    let value = U256::from(sim.value);
    let tx_hash = module.prepare_tx_hash(ACCOUNT, RECIPIENT, value, &[]).await?;
    let root = env
        .registry
        .current_root(group_id)
        .await
        .context("group registry has no root for the new group")?;

    let outsider = DevIdentity::from_seed(u64::from(sim.members) + 1);
    let outsider_rejected = matches!(
        module
            .initiate_tx(
                ACCOUNT,
                RECIPIENT,
                value,
                Bytes::default(),
                &outsider.prove(root, tx_hash),
                auto_execute,
            )
            .await,
        Err(MsaError::InvalidProof)
    );

    let initiator = identities.first().context("simulation needs at least one member")?;
    let receipt = module
        .initiate_tx(
            ACCOUNT,
            RECIPIENT,
            value,
            Bytes::default(),
            &initiator.prove(root, tx_hash),
            auto_execute,
        )
        .await?;
    let mut executed = receipt.execution.is_executed();
    let status = module.tx_status(ACCOUNT, tx_hash).await.ok();
    let mut approvals = vec![ApprovalStep::new(0, &receipt, status)];

    for (index, identity) in identities.iter().enumerate().take(usize::from(sim.threshold)).skip(1) {
        let receipt = module
            .sign_tx(ACCOUNT, tx_hash, &identity.prove(root, tx_hash), auto_execute)
            .await?;
        executed |= receipt.execution.is_executed();
        let status = module.tx_status(ACCOUNT, tx_hash).await.ok();
        approvals.push(ApprovalStep::new(index, &receipt, status));
    }

    let explicit_execute = !executed;
    if explicit_execute {
        module.execute_tx(ACCOUNT, tx_hash).await?;
    }

    let mut emitted = Vec::new();
    while let Ok(event) = events.try_recv() {
        emitted.push(event);
    }

    let snapshot = module.snapshot(ACCOUNT).await;
    Ok(SimulationReport {
        module: format!("{} {}", module.name(), module.version()),
        account: ACCOUNT,
        group_id,
        members: snapshot.members,
        threshold: snapshot.threshold,
        tx_hash,
        outsider_rejected,
        approvals,
        explicit_execute,
        recipient_balance: env.executor.balance_of(RECIPIENT).await,
        account_balance: env.executor.balance_of(ACCOUNT).await,
        sequence_number: snapshot.sequence_number,
        nullifiers_consumed: snapshot.nullifiers.len(),
        events: emitted,
    })
}

pub async fn handle_simulate(
    config: &AppConfig,
    members: Option<u8>,
    threshold: Option<u8>,
    auto_execute: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(members) = members {
        config.simulation.members = members;
    }
    if let Some(threshold) = threshold {
        config.simulation.threshold = threshold;
    }
    config.validate()?;

    let report = run_simulation(&config, auto_execute).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!(
                "\x1b[38;5;46m[+]\x1b[0m {} installed {}-of-{} on {:?} (group {})",
                report.module,
                report.threshold,
                report.members.len(),
                report.account,
                report.group_id
            );
            println!("    tx hash {:?}", report.tx_hash);
            if report.outsider_rejected {
                println!("    non-member proof rejected");
            }
            for step in &report.approvals {
                let status = step
                    .status
                    .map(|s| format!("{:?}", s).to_lowercase())
                    .unwrap_or_else(|| "executed".to_string());
                println!(
                    "    member #{} approved ({} approvals, {}, execution {})",
                    step.member, step.approval_count, status, step.execution
                );
            }
            if report.explicit_execute {
                println!("    executeTx called after threshold was reached");
            }
            println!(
                "\x1b[38;5;46m[+]\x1b[0m Recipient balance {} wei, account balance {} wei",
                report.recipient_balance, report.account_balance
            );
            println!(
                "    sequence {} | nullifiers {} | events {}",
                report.sequence_number,
                report.nullifiers_consumed,
                report.events.len()
            );
        }
    }
    Ok(())
}
