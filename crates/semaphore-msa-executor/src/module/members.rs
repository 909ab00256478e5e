use super::{installed, SemaphoreMsaModule};
use semaphore_msa_types::{Address, Commitment, ModuleEvent, MsaError, MsaResult};
use tracing::debug;

impl SemaphoreMsaModule {
    pub async fn add_members(&self, account: Address, commitments: &[Commitment]) -> MsaResult<()> {
        let mut slot = self.lock_account(account).await?;
        let state = installed(&mut slot.state, account)?;
        if commitments.is_empty() {
            debug!("Empty member batch for {:?}", account);
            return Ok(());
        }

        state.roster.check_additions(commitments)?;
        self.registry.add_members(state.group_id, commitments).await?;
        state.roster.add(commitments)?;

        self.emit(ModuleEvent::MembersAdded {
            account,
            commitments: commitments.to_vec(),
            member_count: state.roster.count(),
        });
        Ok(())
    }

    /// Removes `commitment`; `predecessor` is the roster entry pointing at it
    /// (see [`SemaphoreMsaModule::predecessor_of`]).
    pub async fn remove_member(
        &self,
        account: Address,
        predecessor: Commitment,
        commitment: Commitment,
    ) -> MsaResult<()> {
        let mut slot = self.lock_account(account).await?;
        let state = installed(&mut slot.state, account)?;

        state.roster.check_removal(&predecessor, &commitment)?;
        if state.roster.count() - 1 < state.threshold {
            return Err(MsaError::MemberCntReachesThreshold { account });
        }
        state.ledger.check_member_count(state.roster.count() - 1)?;

        self.registry.remove_member(state.group_id, commitment).await?;
        state.roster.remove(&predecessor, &commitment)?;

        self.emit(ModuleEvent::MemberRemoved {
            account,
            commitment,
            member_count: state.roster.count(),
        });
        Ok(())
    }
}
