use semaphore_msa_types::{MsaError, MsaResult, DEFAULT_MAX_MEMBERS, DEFAULT_ROOT_VALIDITY_SECS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NullifierRetention {
    /// Records live as long as the account's nullifier set.
    #[default]
    Permanent,
    /// Records for a transaction's scope are dropped once it executes.
    PruneOnExecute,
}

impl std::fmt::Display for NullifierRetention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NullifierRetention::Permanent => write!(f, "permanent"),
            NullifierRetention::PruneOnExecute => write!(f, "prune_on_execute"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub max_members: u8,
    pub nullifier_retention: NullifierRetention,
    pub event_capacity: usize,
    pub default_root_validity_secs: u64,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_MEMBERS,
            nullifier_retention: NullifierRetention::default(),
            event_capacity: 256,
            default_root_validity_secs: DEFAULT_ROOT_VALIDITY_SECS,
        }
    }
}

impl ModuleConfig {
    pub fn validate(&self) -> MsaResult<()> {
        if self.max_members == 0 {
            return Err(MsaError::Config("max_members must be at least 1".into()));
        }
        if self.event_capacity == 0 {
            return Err(MsaError::Config("event_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
