use crate::adapters::coinbase::DEFAULT_BASE_URL;
use crate::core::executor::RetryPolicy;
use crate::core::precision::{PrecisionTable, DEFAULT_PRECISION, MAX_PRECISION};
use crate::core::report::DEFAULT_REPORT_PREFIX;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Optional settings file. Every section and key has a default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidationSettings {
    pub exchange: ExchangeSettings,
    pub execution: ExecutionSettings,
    pub report: ReportSettings,
    pub precision: PrecisionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    pub max_attempts: u32,
    pub rate_limit_backoff_ms: u64,
    pub inter_item_delay_ms: u64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff_ms: 2000,
            inter_item_delay_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub prefix: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_REPORT_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionSettings {
    pub default: u32,
    pub overrides: BTreeMap<String, u32>,
}

impl Default for PrecisionSettings {
    fn default() -> Self {
        Self {
            default: DEFAULT_PRECISION,
            overrides: BTreeMap::new(),
        }
    }
}

impl LiquidationSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// No path means built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn precision_table(&self) -> PrecisionTable {
        PrecisionTable::builtin()
            .with_default(self.precision.default)
            .with_overrides(self.precision.overrides.iter().map(|(k, v)| (k, *v)))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.execution.max_attempts,
            backoff: Duration::from_millis(self.execution.rate_limit_backoff_ms),
        }
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.execution.inter_item_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange.timeout_seconds)
    }
}

impl Validate for LiquidationSettings {
    fn validate(&self) -> Result<()> {
        validate_url("exchange.base_url", &self.exchange.base_url)?;
        validate_positive_number("execution.max_attempts", self.execution.max_attempts, 1)?;
        validate_non_empty_string("report.prefix", &self.report.prefix)?;
        validate_range("precision.default", self.precision.default, 0, MAX_PRECISION)?;
        for (symbol, places) in &self.precision.overrides {
            validate_range(
                &format!("precision.overrides.{}", symbol),
                *places,
                0,
                MAX_PRECISION,
            )?;
        }
        Ok(())
    }
}
