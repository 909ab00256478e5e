//! In-process collaborators for tests and local simulation.

mod calls;
mod prover;
mod registry;
mod signer;

pub use calls::{BalanceCallExecutor, RecordedCall};
pub use prover::{dev_seal, DevIdentity, DevProofVerifier};
pub use registry::{members_root, tree_depth, InMemoryGroupRegistry, RootMembership};
pub use signer::{DevSignatureScheme, DevSigner};

use crate::collaborators::Clock;
use crate::module::Collaborators;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self { now: AtomicU64::new(start) }
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A full set of in-memory collaborators sharing one manual clock.
#[derive(Clone)]
pub struct DevEnvironment {
    pub registry: Arc<InMemoryGroupRegistry>,
    pub verifier: Arc<DevProofVerifier>,
    pub executor: Arc<BalanceCallExecutor>,
    pub clock: Arc<ManualClock>,
}

impl DevEnvironment {
    pub fn new(start: u64, root_validity_secs: u64) -> Self {
        let clock = Arc::new(ManualClock::new(start));
        let registry = Arc::new(InMemoryGroupRegistry::new(clock.clone(), root_validity_secs));
        Self {
            verifier: Arc::new(DevProofVerifier::new(registry.membership())),
            registry,
            executor: Arc::new(BalanceCallExecutor::new()),
            clock,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            registry: self.registry.clone(),
            verifier: self.verifier.clone(),
            executor: self.executor.clone(),
            clock: self.clock.clone(),
        }
    }
}
