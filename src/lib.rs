pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{coinbase::CoinbaseClient, prompt::TerminalConfirmation, storage::LocalStorage};
pub use config::{credentials::Credentials, toml_config::LiquidationSettings, CliConfig};
pub use core::engine::{EngineSettings, LiquidationEngine};
pub use utils::error::{LiquidationError, Result};
