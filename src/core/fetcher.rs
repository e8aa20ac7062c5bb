use crate::domain::model::{Balance, Portfolio};
use crate::domain::ports::Exchange;
use crate::utils::error::{LiquidationError, Result};

/// Picks the requested portfolio, or the first one the key can see.
pub async fn select_portfolio<E: Exchange>(
    exchange: &E,
    requested: Option<&str>,
) -> Result<Portfolio> {
    let portfolios = exchange.list_portfolios().await?;
    tracing::debug!("Exchange returned {} portfolios", portfolios.len());

    match requested {
        Some(id) => portfolios
            .into_iter()
            .find(|p| p.uuid == id)
            .ok_or_else(|| LiquidationError::PortfolioNotFound {
                portfolio_id: id.to_string(),
            }),
        None => portfolios
            .into_iter()
            .next()
            .ok_or(LiquidationError::NoPortfolios),
    }
}

pub async fn fetch_balances<E: Exchange>(
    exchange: &E,
    requested: Option<&str>,
) -> Result<(Portfolio, Vec<Balance>)> {
    let portfolio = select_portfolio(exchange, requested).await?;
    tracing::info!("Using portfolio: {} ({})", portfolio.uuid, portfolio.name);

    let balances = exchange.portfolio_balances(&portfolio.uuid).await?;
    tracing::info!("Processing {} portfolio assets...", balances.len());
    for balance in balances.iter().filter(|b| !b.amount.is_zero()) {
        tracing::debug!(
            "Found balance: {} {} = ${:.2}",
            balance.amount,
            balance.symbol,
            balance.usd_value
        );
    }

    Ok((portfolio, balances))
}
