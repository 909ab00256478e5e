use super::commands::Cli;
use crate::config::LoggingConfig;
use anyhow::{anyhow, bail, Context};
use semaphore_msa_types::{Address, U256};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn filter_directive(cli: &Cli, logging: &LoggingConfig) -> String {
    if cli.quiet {
        return "warn".to_string();
    }
    match cli.verbose {
        0 => logging.level.to_string(),
        1 => "info,semaphore_msa_executor=debug".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Flags on the command line win over the `[logging]` section.
pub fn init_logging(cli: &Cli, logging: &LoggingConfig) -> anyhow::Result<()> {
    let level = filter_directive(cli, logging);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let log_file = cli.log_file.as_ref().or(logging.file.as_ref());

    let result = match (log_file, logging.json) {
        (Some(path), json) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            let writer = std::sync::Mutex::new(file);
            if json {
                subscriber.with(fmt::layer().json().with_writer(writer)).try_init()
            } else {
                subscriber
                    .with(fmt::layer().with_writer(writer).with_ansi(false))
                    .try_init()
            }
        }
        (None, true) => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (None, false) => subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(cli.verbose >= 2),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    let hex_part = s.trim().strip_prefix("0x").unwrap_or(s.trim());
    if hex_part.len() != 40 {
        bail!("Invalid address length: expected 40 hex chars, got {}", hex_part.len());
    }
    let bytes = hex::decode(hex_part).with_context(|| format!("Invalid address hex: {}", s))?;
    Ok(Address::from_slice(&bytes))
}

/// Decimal, or `0x`-prefixed hex.
pub fn parse_u256(s: &str) -> anyhow::Result<U256> {
    let s = s.trim();
    match s.strip_prefix("0x") {
        Some(hex_part) => {
            U256::from_str_radix(hex_part, 16).map_err(|e| anyhow!("Invalid hex value {}: {}", s, e))
        }
        None => U256::from_dec_str(s).map_err(|e| anyhow!("Invalid decimal value {}: {}", s, e)),
    }
}

pub fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let s = s.trim();
    hex::decode(s.strip_prefix("0x").unwrap_or(s)).with_context(|| format!("Invalid hex: {}", s))
}
