use super::{installed, SemaphoreMsaModule};
use crate::account::AccountState;
use crate::roster::MemberRoster;
use semaphore_msa_crypto::InstallData;
use semaphore_msa_types::{Address, Commitment, GroupId, ModuleEvent, MsaError, MsaResult};
use tracing::{info, warn};

impl SemaphoreMsaModule {
    /// Installs the module for `account`: creates its group and seeds the
    /// roster with `commitments`.
    pub async fn install(
        &self,
        account: Address,
        threshold: u8,
        commitments: &[Commitment],
    ) -> MsaResult<GroupId> {
        let mut slot = self.lock_slot(account).await;
        if slot.state.is_some() {
            return Err(MsaError::ModuleAlreadyInitialized { account });
        }
        if commitments.is_empty() {
            return Err(MsaError::InvalidInstallData("no commitments".into()));
        }
        if threshold == 0 || threshold as usize > commitments.len() {
            return Err(MsaError::InvalidThreshold { account, threshold });
        }

        let mut roster = MemberRoster::new(account, self.config.max_members);
        roster.check_additions(commitments)?;

        let group_id = self.registry.create_group(self.address).await?;
        if let Err(e) = self.registry.add_members(group_id, commitments).await {
            if let Err(cleanup) = self.registry.delete_group(group_id).await {
                warn!("Failed to drop group {} of aborted install for {:?}: {}", group_id, account, cleanup);
            }
            return Err(e);
        }

        roster.add(commitments)?;
        let member_count = roster.count();
        slot.state = Some(AccountState::new(account, threshold, group_id, roster));

        self.emit(ModuleEvent::ModuleInstalled {
            account,
            group_id,
            threshold,
            member_count,
        });
        Ok(group_id)
    }

    /// Install entry point taking the packed install payload.
    pub async fn on_install(&self, account: Address, data: &[u8]) -> MsaResult<GroupId> {
        let install = InstallData::decode(data)?;
        self.install(account, install.threshold, &install.commitments).await
    }

    /// Drops the account's threshold, roster, sequence and pending
    /// transactions. Consumed nullifiers are kept: they keep blocking
    /// replays after a reinstall restarts the sequence, and `snapshot`
    /// still reports them for the uninstalled account. The group stays in
    /// the registry.
    pub async fn uninstall(&self, account: Address) -> MsaResult<()> {
        let mut slot = self.lock_account(account).await?;
        let state = slot.state.take().ok_or(MsaError::NotInitialized { account })?;

        info!(
            "Uninstalled account {:?}: dropped {} members and {} pending transactions",
            account,
            state.roster.count(),
            state.ledger.len()
        );
        self.emit(ModuleEvent::ModuleUninstalled { account });
        Ok(())
    }

    pub async fn set_threshold(&self, account: Address, threshold: u8) -> MsaResult<()> {
        let mut slot = self.lock_account(account).await?;
        let state = installed(&mut slot.state, account)?;
        if threshold == 0 || threshold > state.roster.count() {
            return Err(MsaError::InvalidThreshold { account, threshold });
        }
        state.threshold = threshold;
        self.emit(ModuleEvent::ThresholdSet { account, threshold });
        Ok(())
    }
}
