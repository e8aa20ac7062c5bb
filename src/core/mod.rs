pub mod engine;
pub mod executor;
pub mod fetcher;
pub mod holdings;
pub mod planner;
pub mod precision;
pub mod report;

pub use crate::domain::model::{Balance, ItemStatus, LiquidationItem, RunMode, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Confirmation, Exchange, Storage};
pub use crate::utils::error::Result;
