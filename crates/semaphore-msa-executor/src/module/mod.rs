//! Multi-sig executor facade: one instance serves many accounts.

mod dispatch;
mod lifecycle;
mod members;
mod queries;
mod transactions;


pub use dispatch::DispatchOutcome;

use crate::account::{AccountSlot, AccountState};
use crate::collaborators::{CallExecutor, Clock, GroupRegistry, ProofVerifier};
use crate::config::ModuleConfig;
use semaphore_msa_types::{Address, ModuleEvent, MsaError, MsaResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard, RwLock};
use tracing::info;

/// External systems the module consumes.
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn GroupRegistry>,
    pub verifier: Arc<dyn ProofVerifier>,
    pub executor: Arc<dyn CallExecutor>,
    pub clock: Arc<dyn Clock>,
}

pub struct SemaphoreMsaModule {
    address: Address,
    config: ModuleConfig,
    registry: Arc<dyn GroupRegistry>,
    verifier: Arc<dyn ProofVerifier>,
    executor: Arc<dyn CallExecutor>,
    clock: Arc<dyn Clock>,
    accounts: RwLock<HashMap<Address, Arc<Mutex<AccountSlot>>>>,
    events: broadcast::Sender<ModuleEvent>,
}

impl SemaphoreMsaModule {
    pub fn new(address: Address, config: ModuleConfig, collaborators: Collaborators) -> MsaResult<Self> {
        config.validate()?;
        let (events, _) = broadcast::channel(config.event_capacity);
        info!(
            "Semaphore MSA executor at {:?} (max members {}, nullifier retention {})",
            address, config.max_members, config.nullifier_retention
        );
        Ok(Self {
            address,
            config,
            registry: collaborators.registry,
            verifier: collaborators.verifier,
            executor: collaborators.executor,
            clock: collaborators.clock,
            accounts: RwLock::new(HashMap::new()),
            events,
        })
    }

    /// Address the module is installed at; the only target the gateway lets
    /// a member credential call.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ModuleEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: ModuleEvent) {
        info!("{} {:?}", event.name(), event);
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Locks the account's slot, creating it if needed. Only install creates slots.
    async fn lock_slot(&self, account: Address) -> OwnedMutexGuard<AccountSlot> {
        let existing = self.accounts.read().await.get(&account).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => self
                .accounts
                .write()
                .await
                .entry(account)
                .or_insert_with(|| Arc::new(Mutex::new(AccountSlot::default())))
                .clone(),
        };
        slot.lock_owned().await
    }

    /// Locks the account's slot only if the account has ever been seen.
    async fn lock_existing(&self, account: Address) -> Option<OwnedMutexGuard<AccountSlot>> {
        let slot = self.accounts.read().await.get(&account).cloned()?;
        Some(slot.lock_owned().await)
    }

    /// Locks an account that has a slot; `NotInitialized` otherwise.
    async fn lock_account(&self, account: Address) -> MsaResult<OwnedMutexGuard<AccountSlot>> {
        self.lock_existing(account)
            .await
            .ok_or(MsaError::NotInitialized { account })
    }

    async fn read_state<T>(
        &self,
        account: Address,
        f: impl FnOnce(&AccountState) -> T,
    ) -> MsaResult<T> {
        let guard = self.lock_account(account).await?;
        guard
            .state
            .as_ref()
            .map(f)
            .ok_or(MsaError::NotInitialized { account })
    }
}

pub(crate) fn installed(
    state: &mut Option<AccountState>,
    account: Address,
) -> MsaResult<&mut AccountState> {
    state.as_mut().ok_or(MsaError::NotInitialized { account })
}
