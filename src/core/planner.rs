use crate::core::precision::PrecisionTable;
use crate::domain::model::{is_cash_equivalent, Balance, ItemStatus, LiquidationItem};
use rust_decimal::Decimal;

/// Builds the sell plan from the exchange-reported balances.
///
/// Cash equivalents, zero balances and dust below `min_usd` are dropped;
/// remaining records keep their original order. Items whose amount floors to
/// zero are returned already `Skipped` so the executor never sends them.
pub fn plan_liquidation(
    balances: &[Balance],
    min_usd: Decimal,
    precision: &PrecisionTable,
) -> Vec<LiquidationItem> {
    balances
        .iter()
        .filter(|b| !is_cash_equivalent(&b.symbol))
        .filter(|b| b.amount > Decimal::ZERO)
        .filter(|b| {
            let keep = b.usd_value >= min_usd;
            if !keep {
                tracing::info!(
                    "Skipping {} (${:.2}) - below minimum threshold (${})",
                    b.symbol,
                    b.usd_value,
                    min_usd
                );
            }
            keep
        })
        .map(|b| build_item(b, precision))
        .collect()
}

fn build_item(balance: &Balance, precision: &PrecisionTable) -> LiquidationItem {
    let places = precision.precision_for(&balance.symbol);
    let floored = precision.floor(&balance.symbol, balance.amount);

    let mut item = LiquidationItem {
        symbol: balance.symbol.clone(),
        raw_amount: balance.amount,
        floored_amount: floored,
        precision: places,
        usd_value: balance.usd_value,
        status: ItemStatus::Pending,
        order_id: None,
        error: None,
        timestamp: None,
    };

    if floored.is_zero() {
        tracing::warn!(
            "{} {} rounds to zero at {} decimal places, nothing to sell",
            balance.amount,
            balance.symbol,
            places
        );
        item.mark_skipped(format!(
            "Amount {} rounds to zero at {} decimal places",
            balance.amount, places
        ));
    }

    item
}

/// Estimated USD value of everything still to be sold.
pub fn planned_total(items: &[LiquidationItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.is_pending())
        .map(|i| i.usd_value)
        .sum()
}
