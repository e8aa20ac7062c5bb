use crate::core::executor::{ExecutorOptions, OrderExecutor};
use crate::core::fetcher::fetch_balances;
use crate::core::planner::{plan_liquidation, planned_total};
use crate::core::precision::PrecisionTable;
use crate::core::report::{summarize, Reporter};
use crate::domain::model::{LiquidationItem, RunMode, RunSummary};
use crate::domain::ports::{Confirmation, Exchange, Storage};
use crate::utils::error::{LiquidationError, Result};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub min_threshold: Decimal,
    pub portfolio: Option<String>,
    pub executor: ExecutorOptions,
}

pub struct LiquidationEngine<E: Exchange, S: Storage, C: Confirmation> {
    exchange: E,
    reporter: Reporter<S>,
    confirmation: C,
    precision: PrecisionTable,
    settings: EngineSettings,
}

impl<E: Exchange, S: Storage, C: Confirmation> LiquidationEngine<E, S, C> {
    pub fn new(
        exchange: E,
        reporter: Reporter<S>,
        confirmation: C,
        precision: PrecisionTable,
        settings: EngineSettings,
    ) -> Self {
        Self {
            exchange,
            reporter,
            confirmation,
            precision,
            settings,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.settings.executor.mode
    }

    /// Fetch → plan → (confirm) → execute → report.
    pub async fn run(&self) -> Result<RunSummary> {
        let mode = self.mode();
        tracing::info!("[START] Starting Coinbase liquidation");
        tracing::info!("Mode: {}", mode);
        tracing::info!("Minimum threshold: ${}", self.settings.min_threshold);

        tracing::info!("[ANALYSIS] Analyzing current balances...");
        let (portfolio, balances) =
            fetch_balances(&self.exchange, self.settings.portfolio.as_deref()).await?;

        let mut items = plan_liquidation(&balances, self.settings.min_threshold, &self.precision);
        if items.is_empty() {
            tracing::info!("No cryptocurrencies found to liquidate (excluding USDC and USD)");
            let report_path = self.reporter.write(mode, &items).await?;
            return Ok(summarize(mode, report_path, &items));
        }

        let total = planned_total(&items);
        let pending = items.iter().filter(|i| i.is_pending()).count();
        log_plan(&items, total);

        match mode {
            RunMode::Trial => {
                tracing::info!("[TRIAL] TRIAL MODE: No actual trades will be executed");
                tracing::info!("Use --live flag to execute actual trades");
            }
            RunMode::Live if pending > 0 => {
                if !self.confirmation.confirm(pending, total)? {
                    tracing::info!("Liquidation cancelled by user");
                    return Err(LiquidationError::Cancelled);
                }
            }
            RunMode::Live => {}
        }

        tracing::info!(
            "{} liquidation...",
            if mode == RunMode::Live { "Executing" } else { "Simulating" }
        );
        let mut options = self.settings.executor.clone();
        if self.settings.portfolio.is_some() {
            options.portfolio_id = Some(portfolio.uuid.clone());
        }
        OrderExecutor::new(&self.exchange, options)
            .execute_all(&mut items)
            .await;

        let report_path = self.reporter.write(mode, &items).await?;
        Ok(summarize(mode, report_path, &items))
    }
}

fn log_plan(items: &[LiquidationItem], total: Decimal) {
    let pending: Vec<&LiquidationItem> = items.iter().filter(|i| i.is_pending()).collect();

    tracing::info!("[PLAN] Liquidation Plan Summary:");
    tracing::info!("Total cryptocurrencies to liquidate: {}", pending.len());
    tracing::info!("Total estimated USD value: ${:.2}", total);
    for item in &pending {
        tracing::info!(
            "  - {} {} @ ${:.2} = ${:.2}",
            item.base_size(),
            item.symbol,
            item.unit_price(),
            item.usd_value
        );
    }

    println!("{}", "=".repeat(60));
    println!("TOTAL PORTFOLIO VALUE: ${:.2} USD", total);
    println!("{}", "=".repeat(60));
}
