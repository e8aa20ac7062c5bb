use crate::domain::model::{ItemStatus, LiquidationItem, RunMode, RunSummary};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Serialize;

pub const DEFAULT_REPORT_PREFIX: &str = "coinbase_liquidation_report";

/// One CSV line. Field order is the column order of the report.
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    currency: &'a str,
    amount: String,
    usd_value: String,
    order_id: Option<&'a str>,
    status: &'static str,
    timestamp: Option<String>,
    error: Option<&'a str>,
}

impl<'a> From<&'a LiquidationItem> for ReportRow<'a> {
    fn from(item: &'a LiquidationItem) -> Self {
        Self {
            currency: &item.symbol,
            amount: item.floored_amount.normalize().to_string(),
            usd_value: item.usd_value.normalize().to_string(),
            order_id: item.order_id.as_deref(),
            status: item.status.as_str(),
            timestamp: item.timestamp.map(|t| t.to_rfc3339()),
            error: item.error.as_deref(),
        }
    }
}

pub struct Reporter<S: Storage> {
    storage: S,
    prefix: String,
}

impl<S: Storage> Reporter<S> {
    pub fn new(storage: S, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
        }
    }

    pub fn file_name(&self, mode: RunMode, at: DateTime<Local>) -> String {
        format!(
            "{}_{}_{}.csv",
            self.prefix,
            mode.as_str(),
            at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Writes the report and returns where it landed.
    pub async fn write(&self, mode: RunMode, items: &[LiquidationItem]) -> Result<String> {
        let data = render_csv(items)?;
        let file_name = self.file_name(mode, Local::now());

        tracing::debug!("Writing report with {} rows to {}", items.len(), file_name);
        let path = self.storage.write_file(&file_name, &data).await?;
        tracing::info!("[REPORT] CSV report generated: {}", path);
        Ok(path)
    }
}

pub fn render_csv(items: &[LiquidationItem]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // 空報告也要有表頭
    writer.write_record([
        "currency",
        "amount",
        "usd_value",
        "order_id",
        "status",
        "timestamp",
        "error",
    ])?;
    for item in items {
        writer.serialize(ReportRow::from(item))?;
    }
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}

pub fn summarize(mode: RunMode, report_path: String, items: &[LiquidationItem]) -> RunSummary {
    let count = |status: ItemStatus| items.iter().filter(|i| i.status == status).count();
    let total_usd: Decimal = items
        .iter()
        .filter(|i| i.status.is_success())
        .map(|i| i.usd_value)
        .sum();

    RunSummary {
        mode,
        report_path,
        successful: count(ItemStatus::Trial) + count(ItemStatus::Executed),
        failed: count(ItemStatus::Failed),
        skipped: count(ItemStatus::Skipped),
        total_usd,
    }
}

pub fn print_summary(summary: &RunSummary) {
    let label = match summary.mode {
        RunMode::Trial => "TOTAL VALUE (SIMULATED)",
        RunMode::Live => "TOTAL VALUE LIQUIDATED",
    };

    tracing::info!("[SUMMARY] Liquidation Summary ({})", summary.mode);
    tracing::info!("Successful trades: {}", summary.successful);
    tracing::info!("Failed trades: {}", summary.failed);
    if summary.skipped > 0 {
        tracing::info!("Skipped (rounds to zero): {}", summary.skipped);
    }
    tracing::info!("CSV report: {}", summary.report_path);

    println!("{}", "=".repeat(60));
    println!(
        "Successful: {}  Failed: {}  Skipped: {}",
        summary.successful, summary.failed, summary.skipped
    );
    println!("{}: ${:.2} USD", label, summary.total_usd);
    println!("📁 Report saved to: {}", summary.report_path);
    println!("{}", "=".repeat(60));
}
