use super::commands::{ConfigAction, OutputFormat};
use crate::config::AppConfig;
use anyhow::bail;
use std::path::Path;

pub fn handle_config(config_path: &Path, action: Option<ConfigAction>, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            if !config_path.exists() {
                println!("\x1b[38;5;245mNo configuration file found at {:?}, showing defaults\x1b[0m", config_path);
            }
            let config = AppConfig::load(config_path)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                OutputFormat::Text => println!("{}", config.to_toml()?),
            }
        }
        Some(ConfigAction::Validate) => {
            if config_path.exists() {
                match AppConfig::load(config_path) {
                    Ok(_) => println!("\x1b[38;5;46m[+]\x1b[0m Configuration is valid"),
                    Err(e) => {
                        println!("\x1b[38;5;196m[-]\x1b[0m Configuration error: {}", e);
                        bail!("invalid configuration at {:?}", config_path);
                    }
                }
            } else {
                println!("\x1b[38;5;245mNo configuration file found at {:?}\x1b[0m", config_path);
            }
        }
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                bail!("{:?} already exists, use --force to overwrite", config_path);
            }
            AppConfig::default().save(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Wrote default configuration to {:?}", config_path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("smsa-cmd-{}-{}.toml", name, std::process::id()))
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let path = temp_path("init");
        std::fs::remove_file(&path).ok();

        handle_config(&path, Some(ConfigAction::Init { force: false }), OutputFormat::Text).unwrap();
        assert!(AppConfig::load(&path).is_ok());
        assert!(handle_config(&path, Some(ConfigAction::Init { force: false }), OutputFormat::Text).is_err());
        assert!(handle_config(&path, Some(ConfigAction::Init { force: true }), OutputFormat::Text).is_ok());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_validate_reports_errors() {
        let path = temp_path("validate");
        std::fs::write(&path, "[module]\nmax_members = 0\n").unwrap();
        let result = handle_config(&path, Some(ConfigAction::Validate), OutputFormat::Text);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
