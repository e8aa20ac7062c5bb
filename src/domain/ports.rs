use crate::domain::model::{Balance, OrderResult, Portfolio, Product};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn min_threshold(&self) -> Decimal;
    fn api_key_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn portfolio(&self) -> Option<&str>;
    fn is_live(&self) -> bool;
    fn check_pairs(&self) -> bool;
}

/// The exchange operations a liquidation run needs.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn list_portfolios(&self) -> Result<Vec<Portfolio>>;
    async fn portfolio_balances(&self, portfolio_id: &str) -> Result<Vec<Balance>>;
    async fn get_product(&self, product_id: &str) -> Result<Product>;
    async fn market_sell(
        &self,
        product_id: &str,
        base_size: &str,
        client_order_id: &str,
        portfolio_id: Option<&str>,
    ) -> Result<OrderResult>;
}

/// Gate in front of live order submission.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, item_count: usize, total_usd: Decimal) -> Result<bool>;
}
