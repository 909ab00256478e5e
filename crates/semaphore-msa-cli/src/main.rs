mod cli;
mod config;

use clap::Parser;
use cli::{
    handle_config, handle_install_data, handle_simulate, handle_tx_hash, init_logging,
    show_selectors, Cli, Commands,
};
use config::{AppConfig, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    // `config` subcommands must still run when the file is invalid
    let config = match cli.command {
        Commands::Config { .. } => AppConfig::default(),
        _ => AppConfig::load(&config_path)?,
    };
    init_logging(&cli, &config.logging)?;

    match cli.command {
        Commands::TxHash { seq, target, value, data } => {
            handle_tx_hash(seq, &target, &value, &data, cli.format)?;
        }
        Commands::Selectors => {
            show_selectors(cli.format)?;
        }
        Commands::InstallData { action } => {
            handle_install_data(action, cli.format)?;
        }
        Commands::Simulate { members, threshold, auto_execute } => {
            handle_simulate(&config, members, threshold, auto_execute, cli.format).await?;
        }
        Commands::Config { action } => {
            handle_config(&config_path, action, cli.format)?;
        }
    }

    Ok(())
}
