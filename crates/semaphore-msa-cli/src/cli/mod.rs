pub mod commands;
mod config_cmd;
mod encoding;
mod simulate;
mod utils;

pub use commands::{Cli, Commands};
pub use config_cmd::handle_config;
pub use encoding::{handle_install_data, handle_tx_hash, show_selectors};
pub use simulate::handle_simulate;
pub use utils::init_logging;
