use semaphore_msa_types::{MsaError, MsaResult, H256, U256};
use std::collections::{BTreeSet, HashSet};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScopedNullifier {
    pub scope: H256,
    pub nullifier: U256,
}

/// Append-only record of consumed `(scope, nullifier)` pairs for one account.
#[derive(Clone, Debug, Default)]
pub struct NullifierTracker {
    set: HashSet<ScopedNullifier>,
}

impl NullifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, scope: &H256, nullifier: &U256) -> bool {
        self.set.contains(&ScopedNullifier {
            scope: *scope,
            nullifier: *nullifier,
        })
    }

    pub fn check(&self, scope: &H256, nullifier: &U256) -> MsaResult<()> {
        if self.contains(scope, nullifier) {
            return Err(MsaError::DuplicateNullifier {
                scope: *scope,
                nullifier: *nullifier,
            });
        }
        Ok(())
    }

    pub fn consume(&mut self, scope: H256, nullifier: U256) -> MsaResult<()> {
        if !self.set.insert(ScopedNullifier { scope, nullifier }) {
            return Err(MsaError::DuplicateNullifier { scope, nullifier });
        }
        Ok(())
    }

    /// Drops every record for `scope`. Returns how many were removed.
    pub fn prune_scope(&mut self, scope: &H256) -> usize {
        let before = self.set.len();
        self.set.retain(|entry| entry.scope != *scope);
        before - self.set.len()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn sorted(&self) -> Vec<(H256, U256)> {
        self.set
            .iter()
            .map(|entry| (entry.scope, entry.nullifier))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
