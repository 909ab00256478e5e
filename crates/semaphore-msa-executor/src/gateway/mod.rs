//! Validator that lets a member credential authorize account operations,
//! but only calls into the account's own Semaphore executor.

mod classify;
mod validator;

#[cfg(test)]
mod tests;

pub use classify::{authorize, classify, AllowedOp, GatedCall};
pub use validator::{
    MemberCredential, UserOperation, ValidationOutcome, MEMBER_SIGNATURE_SIZE, PUBLIC_KEY_SIZE,
};

use crate::collaborators::MemberSignatureScheme;
use crate::module::SemaphoreMsaModule;
use semaphore_msa_types::{Address, ModuleEvent, MsaError, MsaResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct AuthorizationGateway {
    module: Arc<SemaphoreMsaModule>,
    signatures: Arc<dyn MemberSignatureScheme>,
    accounts: RwLock<HashSet<Address>>,
}

impl AuthorizationGateway {
    pub fn new(module: Arc<SemaphoreMsaModule>, signatures: Arc<dyn MemberSignatureScheme>) -> Self {
        Self {
            module,
            signatures,
            accounts: RwLock::new(HashSet::new()),
        }
    }

    pub fn module(&self) -> &Arc<SemaphoreMsaModule> {
        &self.module
    }

    /// Requires the executor to be installed for `account` first.
    pub async fn install(&self, account: Address) -> MsaResult<()> {
        if !self.module.is_initialized(account).await {
            return Err(MsaError::SemaphoreExecutorNotInitialized { account });
        }
        if !self.accounts.write().await.insert(account) {
            return Err(MsaError::ModuleAlreadyInitialized { account });
        }
        info!("Gateway installed for {:?}", account);
        self.module.emit(ModuleEvent::GatewayInstalled { account });
        Ok(())
    }

    pub async fn uninstall(&self, account: Address) -> MsaResult<()> {
        if !self.accounts.write().await.remove(&account) {
            return Err(MsaError::NotInitialized { account });
        }
        self.module.emit(ModuleEvent::GatewayUninstalled { account });
        Ok(())
    }

    pub async fn is_installed(&self, account: Address) -> bool {
        self.accounts.read().await.contains(&account)
    }
}
