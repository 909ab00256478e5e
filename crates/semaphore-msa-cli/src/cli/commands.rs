use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "smsa")]
#[command(version = BUILD_VERSION)]
#[command(about = "Semaphore multi-sig executor tooling")]
#[command(long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(short, long, global = true, value_name = "FILE", env = "SMSA_CONFIG", help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[arg(long, global = true, value_name = "FILE", help = "Write logs to file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text", help = "Output format")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compute the hash members approve for a transaction")]
    #[command(long_about = "Compute keccak256(abi.encodePacked(seq, target, value, callData)).\n\nUse the account's current sequence number for a transaction that has not been initiated yet.")]
    TxHash {
        #[arg(long, help = "Account sequence number")]
        seq: u64,
        #[arg(long, value_name = "ADDRESS", help = "Call target (0x...)")]
        target: String,
        #[arg(long, default_value = "0", help = "Wei value, decimal or 0x hex")]
        value: String,
        #[arg(long, default_value = "0x", value_name = "HEX", help = "Call data")]
        data: String,
    },

    #[command(about = "Print the executor's function selectors")]
    Selectors,

    #[command(about = "Encode or decode executor install data")]
    InstallData {
        #[command(subcommand)]
        action: InstallDataAction,
    },

    #[command(about = "Run a threshold approval flow against in-memory collaborators")]
    Simulate {
        #[arg(long, help = "Number of members (overrides config)")]
        members: Option<u8>,
        #[arg(long, help = "Approval threshold (overrides config)")]
        threshold: Option<u8>,
        #[arg(long, help = "Execute as soon as the threshold is met")]
        auto_execute: bool,
    },

    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum InstallDataAction {
    #[command(about = "Encode threshold and commitments")]
    Encode {
        #[arg(short, long)]
        threshold: u8,
        #[arg(required = true, value_name = "COMMITMENT", help = "Commitments, decimal or 0x hex")]
        commitments: Vec<String>,
    },
    #[command(about = "Decode a hex install payload")]
    Decode {
        #[arg(value_name = "HEX")]
        payload: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Print the effective configuration")]
    Show,
    #[command(about = "Validate the configuration file")]
    Validate,
    #[command(about = "Write the default configuration to the config path")]
    Init {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tx_hash() {
        let cli = Cli::try_parse_from([
            "smsa",
            "--format",
            "json",
            "tx-hash",
            "--seq",
            "3",
            "--target",
            "0x0000000000000000000000000000000000000042",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::TxHash { seq, value, data, .. } => {
                assert_eq!(seq, 3);
                assert_eq!(value, "0");
                assert_eq!(data, "0x");
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_encode_requires_commitments() {
        assert!(Cli::try_parse_from(["smsa", "install-data", "encode", "-t", "1"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["smsa", "simulate", "-vv", "--members", "4"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Simulate { members: Some(4), .. }));
    }
}
