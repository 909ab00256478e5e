use semaphore_msa_executor::{ModuleConfig, NullifierRetention};
use semaphore_msa_types::{MsaError, MsaResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "smsa.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub json: bool,
}

/// Parameters of the in-memory `simulate` run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub members: u8,
    pub threshold: u8,
    /// Wei credited to the simulated account before the run.
    pub funding: u64,
    /// Wei moved by the simulated transaction.
    pub value: u64,
    /// Unix seconds for the simulated clock; wall-clock time when unset.
    pub start_time: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            members: 3,
            threshold: 2,
            funding: 1_000_000,
            value: 1_000,
            start_time: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub module: ModuleConfig,
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> MsaResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| MsaError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| MsaError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> MsaResult<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| MsaError::Config(format!("Failed to create config dir: {}", e)))?;
            }
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| MsaError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    pub fn to_toml(&self) -> MsaResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| MsaError::Config(format!("Failed to serialize config: {}", e)))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// `SMSA_*` overrides. Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("SMSA_LOG_LEVEL") {
            match LogLevel::parse(&level) {
                Some(level) => self.logging.level = level,
                None => warn!("Ignoring SMSA_LOG_LEVEL={}", level),
            }
        }

        if let Some(file) = lookup("SMSA_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }

        if lookup("SMSA_LOG_JSON").is_some() {
            self.logging.json = true;
        }

        if let Some(max) = lookup("SMSA_MAX_MEMBERS") {
            match max.parse() {
                Ok(max) => self.module.max_members = max,
                Err(_) => warn!("Ignoring SMSA_MAX_MEMBERS={}", max),
            }
        }

        if let Some(retention) = lookup("SMSA_NULLIFIER_RETENTION") {
            match retention.as_str() {
                "permanent" => self.module.nullifier_retention = NullifierRetention::Permanent,
                "prune_on_execute" => {
                    self.module.nullifier_retention = NullifierRetention::PruneOnExecute
                }
                other => warn!("Ignoring SMSA_NULLIFIER_RETENTION={}", other),
            }
        }

        if let Some(secs) = lookup("SMSA_ROOT_VALIDITY_SECS") {
            if let Ok(secs) = secs.parse() {
                self.module.default_root_validity_secs = secs;
            }
        }

        if let Some(members) = lookup("SMSA_SIM_MEMBERS") {
            if let Ok(members) = members.parse() {
                self.simulation.members = members;
            }
        }

        if let Some(threshold) = lookup("SMSA_SIM_THRESHOLD") {
            if let Ok(threshold) = threshold.parse() {
                self.simulation.threshold = threshold;
            }
        }
    }

    pub fn validate(&self) -> MsaResult<()> {
        self.module.validate()?;

        let sim = &self.simulation;
        if sim.members == 0 {
            return Err(MsaError::Config("simulation.members must be at least 1".into()));
        }
        if sim.members > self.module.max_members {
            return Err(MsaError::Config(format!(
                "simulation.members ({}) exceeds module.max_members ({})",
                sim.members, self.module.max_members
            )));
        }
        if sim.threshold == 0 || sim.threshold > sim.members {
            return Err(MsaError::Config(format!(
                "simulation.threshold must be within 1..={}",
                sim.members
            )));
        }
        if sim.value > sim.funding {
            return Err(MsaError::Config("simulation.value exceeds simulation.funding".into()));
        }
        Ok(())
    }
}
