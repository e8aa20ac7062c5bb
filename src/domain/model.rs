use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Assets that are already cash and are never sold.
pub const CASH_EQUIVALENTS: [&str; 2] = ["USD", "USDC"];

pub fn is_cash_equivalent(symbol: &str) -> bool {
    CASH_EQUIVALENTS.contains(&symbol)
}

/// One spot position as valued by the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub symbol: String,
    pub amount: Decimal,
    pub usd_value: Decimal,
}

impl Balance {
    pub fn new(symbol: impl Into<String>, amount: Decimal, usd_value: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            usd_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: String,
    pub trading_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    pub order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Trial,
    Live,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Trial => "trial",
            RunMode::Live => "live",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    Trial,
    Executed,
    Failed,
    Skipped,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "PENDING",
            ItemStatus::Trial => "TRIAL",
            ItemStatus::Executed => "EXECUTED",
            ItemStatus::Failed => "FAILED",
            ItemStatus::Skipped => "SKIPPED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemStatus::Trial | ItemStatus::Executed)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A planned sell. Starts `Pending` (or `Skipped` when the floored amount is
/// zero) and is resolved exactly once by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidationItem {
    pub symbol: String,
    pub raw_amount: Decimal,
    pub floored_amount: Decimal,
    pub precision: u32,
    pub usd_value: Decimal,
    pub status: ItemStatus,
    pub order_id: Option<String>,
    pub error: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LiquidationItem {
    pub fn product_id(&self) -> String {
        format!("{}-USD", self.symbol)
    }

    pub fn is_pending(&self) -> bool {
        self.status == ItemStatus::Pending
    }

    /// Order size as sent to the exchange, without trailing zeros.
    pub fn base_size(&self) -> String {
        self.floored_amount.normalize().to_string()
    }

    /// Implied USD price per unit, zero when it cannot be represented.
    pub fn unit_price(&self) -> Decimal {
        self.usd_value
            .checked_div(self.raw_amount)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn mark_trial(&mut self) {
        self.resolve(ItemStatus::Trial, None, None);
    }

    pub fn mark_executed(&mut self, order_id: String) {
        self.resolve(ItemStatus::Executed, Some(order_id), None);
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.resolve(ItemStatus::Failed, None, Some(error.into()));
    }

    pub fn mark_skipped(&mut self, reason: impl Into<String>) {
        self.resolve(ItemStatus::Skipped, None, Some(reason.into()));
    }

    fn resolve(&mut self, status: ItemStatus, order_id: Option<String>, error: Option<String>) {
        debug_assert!(self.is_pending(), "{} already resolved", self.symbol);
        self.status = status;
        self.order_id = order_id;
        self.error = error;
        self.timestamp = Some(Utc::now());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub report_path: String,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    /// USD value of the executed (live) or simulated (trial) items.
    pub total_usd: Decimal,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.successful + self.failed + self.skipped
    }
}
