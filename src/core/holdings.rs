use crate::domain::model::{is_cash_equivalent, Balance};
use rust_decimal::Decimal;

pub const TOP_HOLDINGS: usize = 10;

/// Read-only view of a portfolio used by the connection check.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingsSummary {
    /// Non-zero balances, largest USD value first.
    pub holdings: Vec<Balance>,
    pub total_usd: Decimal,
    pub cash: Vec<Balance>,
    pub cash_usd: Decimal,
    pub liquidation_assets: usize,
    pub liquidation_usd: Decimal,
}

impl HoldingsSummary {
    pub fn from_balances(balances: &[Balance]) -> Self {
        let mut holdings: Vec<Balance> = balances
            .iter()
            .filter(|b| b.amount > Decimal::ZERO)
            .cloned()
            .collect();
        holdings.sort_by(|a, b| b.usd_value.cmp(&a.usd_value));

        let total_usd = holdings.iter().map(|b| b.usd_value).sum();
        let (cash, crypto): (Vec<Balance>, Vec<Balance>) = holdings
            .iter()
            .cloned()
            .partition(|b| is_cash_equivalent(&b.symbol));

        Self {
            total_usd,
            cash_usd: cash.iter().map(|b| b.usd_value).sum(),
            cash,
            liquidation_assets: crypto.len(),
            liquidation_usd: crypto.iter().map(|b| b.usd_value).sum(),
            holdings,
        }
    }

    pub fn top(&self) -> &[Balance] {
        &self.holdings[..self.holdings.len().min(TOP_HOLDINGS)]
    }

    /// Count and value of the holdings beyond the top list.
    pub fn remainder(&self) -> Option<(usize, Decimal)> {
        let rest = self.holdings.get(TOP_HOLDINGS..)?;
        if rest.is_empty() {
            return None;
        }
        Some((rest.len(), rest.iter().map(|b| b.usd_value).sum()))
    }

    pub fn print(&self) {
        println!(
            "✅ API connection successful! Found {} assets with balances",
            self.holdings.len()
        );
        println!("✅ Total portfolio value: ${:.2} USD", self.total_usd);

        println!("\nTop Holdings Summary:");
        for b in self.top() {
            println!("  - {}: {} = ${:.2}", b.symbol, b.amount, b.usd_value);
        }
        if let Some((count, value)) = self.remainder() {
            println!("  ... and {} more assets worth ${:.2}", count, value);
        }

        println!("\nAssets NOT liquidated (kept as stablecoin/fiat):");
        for b in &self.cash {
            println!("  - {}: {} = ${:.2}", b.symbol, b.amount, b.usd_value);
        }
        println!("  - Stablecoin/Fiat total: ${:.2}", self.cash_usd);

        println!(
            "\nLiquidation value (crypto only): ${:.2} USD from {} crypto assets",
            self.liquidation_usd, self.liquidation_assets
        );
    }
}
