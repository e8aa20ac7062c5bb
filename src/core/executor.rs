use crate::domain::model::{LiquidationItem, OrderResult, Product, RunMode};
use crate::domain::ports::Exchange;
use crate::utils::error::{LiquidationError, Result};
use chrono::Utc;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per request, the first one included.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    pub mode: RunMode,
    pub retry: RetryPolicy,
    pub inter_item_delay: Duration,
    /// Trial mode only: read each product to confirm the USD pair exists.
    pub check_pairs: bool,
    /// Non-default portfolio the orders are placed against.
    pub portfolio_id: Option<String>,
}

impl ExecutorOptions {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            retry: RetryPolicy::default(),
            inter_item_delay: Duration::from_millis(100),
            check_pairs: false,
            portfolio_id: None,
        }
    }
}

pub struct OrderExecutor<'a, E: Exchange> {
    exchange: &'a E,
    options: ExecutorOptions,
}

impl<'a, E: Exchange> OrderExecutor<'a, E> {
    pub fn new(exchange: &'a E, options: ExecutorOptions) -> Self {
        Self { exchange, options }
    }

    /// Resolves every pending item in order. A failed item never stops the run.
    pub async fn execute_all(&self, items: &mut [LiquidationItem]) {
        let mut first = true;
        for item in items.iter_mut().filter(|i| i.is_pending()) {
            if !first && !self.options.inter_item_delay.is_zero() {
                tokio::time::sleep(self.options.inter_item_delay).await;
            }
            first = false;
            self.execute(item).await;
        }
    }

    pub async fn execute(&self, item: &mut LiquidationItem) {
        if !item.is_pending() {
            return;
        }

        match self.options.mode {
            RunMode::Trial => self.simulate(item).await,
            RunMode::Live => self.submit(item).await,
        }
    }

    async fn simulate(&self, item: &mut LiquidationItem) {
        if self.options.check_pairs {
            let product_id = item.product_id();
            let checked = self
                .with_retry(&product_id, || self.exchange.get_product(&product_id))
                .await
                .and_then(|product| ensure_tradable(product, &product_id));
            if let Err(e) = checked {
                record_failure(item, e);
                return;
            }
        }

        item.mark_trial();
        tracing::info!(
            "[TRIAL] Would sell {} {} for ~${:.2}",
            item.base_size(),
            item.symbol,
            item.usd_value
        );
    }

    async fn submit(&self, item: &mut LiquidationItem) {
        let product_id = item.product_id();
        let base_size = item.base_size();
        let client_order_id = format!(
            "liquidation_{}_{}",
            item.symbol,
            Utc::now().timestamp_millis()
        );
        let portfolio_id = self.options.portfolio_id.as_deref();

        let result: Result<OrderResult> = self
            .with_retry(&product_id, || {
                self.exchange
                    .market_sell(&product_id, &base_size, &client_order_id, portfolio_id)
            })
            .await;

        match result {
            Ok(order) => {
                tracing::info!(
                    "[SUCCESS] EXECUTED: Sold {} {} for ~${:.2} (order {})",
                    base_size,
                    item.symbol,
                    item.usd_value,
                    order.order_id
                );
                item.mark_executed(order.order_id);
            }
            Err(e) => record_failure(item, e),
        }
    }

    /// Repeats `op` while the exchange answers with a rate limit, up to
    /// `max_attempts` tries in total.
    async fn with_retry<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.options.retry.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Err(e) if e.is_rate_limited() && attempt < max_attempts => {
                    tracing::warn!(
                        "Rate limited on {} (attempt {}/{}), waiting {:?} before retry...",
                        label,
                        attempt,
                        max_attempts,
                        self.options.retry.backoff
                    );
                    tokio::time::sleep(self.options.retry.backoff).await;
                    attempt += 1;
                }
                Err(LiquidationError::RateLimited { message }) => {
                    return Err(LiquidationError::RateLimited {
                        message: format!("gave up after {} attempts ({})", max_attempts, message),
                    });
                }
                other => return other,
            }
        }
    }
}

fn ensure_tradable(product: Product, product_id: &str) -> Result<Product> {
    if product.trading_disabled {
        return Err(LiquidationError::InvalidProduct {
            product_id: product_id.to_string(),
        });
    }
    Ok(product)
}

fn record_failure(item: &mut LiquidationItem, error: LiquidationError) {
    match &error {
        LiquidationError::InvalidProduct { .. } => {
            tracing::warn!("[SKIP] {} has no USD trading pair", item.symbol);
        }
        _ => {
            tracing::error!("[ERROR] FAILED to sell {}: {}", item.symbol, error);
        }
    }
    item.mark_failed(error.to_string());
}
