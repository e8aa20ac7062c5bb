pub mod credentials;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_decimal, validate_path, Validate};
use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "coinbase-liquidation")]
#[command(about = "Sell every non-cash Coinbase balance to USD and write a CSV report")]
#[command(after_help = "Examples:
  coinbase-liquidation                              # Trial run (default)
  coinbase-liquidation --live                       # Execute actual trades
  coinbase-liquidation --live --min-threshold 5.0   # Set $5 minimum")]
pub struct CliConfig {
    /// Execute actual trades (default: trial mode)
    #[arg(long)]
    pub live: bool,

    /// Minimum USD value to consider for liquidation
    #[arg(long, default_value = "0.01")]
    pub min_threshold: Decimal,

    /// Path to the Coinbase CDP API key JSON file
    #[arg(long, default_value = credentials::DEFAULT_CREDENTIALS_FILE)]
    pub api_key: String,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    /// Directory the CSV report is written to
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Portfolio UUID (default: the first portfolio returned)
    #[arg(long)]
    pub portfolio: Option<String>,

    /// In trial mode, check that each USD trading pair exists
    #[arg(long)]
    pub check_pairs: bool,

    /// Log file path
    #[arg(long, default_value = "liquidation.log")]
    pub log_file: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn log_file(&self) -> Option<&std::path::Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_negative_decimal("min_threshold", self.min_threshold)?;
        validate_path("api_key", &self.api_key)?;
        validate_path("output_dir", &self.output_dir)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn min_threshold(&self) -> Decimal {
        self.min_threshold
    }

    fn api_key_path(&self) -> &str {
        &self.api_key
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn portfolio(&self) -> Option<&str> {
        self.portfolio.as_deref()
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn check_pairs(&self) -> bool {
        self.check_pairs
    }
}
