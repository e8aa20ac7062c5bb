//! Wire types for the Coinbase Advanced Trade v3 REST API.

use crate::domain::model::{Balance, OrderResult, Portfolio, Product};
use crate::utils::error::{LiquidationError, Result};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct PortfoliosResponse {
    pub portfolios: Vec<PortfolioDto>,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioDto {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deleted: bool,
}

impl From<PortfolioDto> for Portfolio {
    fn from(dto: PortfolioDto) -> Self {
        Portfolio {
            uuid: dto.uuid,
            name: dto.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BreakdownResponse {
    pub breakdown: Breakdown,
}

#[derive(Debug, Deserialize)]
pub struct Breakdown {
    #[serde(default)]
    pub spot_positions: Vec<SpotPosition>,
}

#[derive(Debug, Deserialize)]
pub struct SpotPosition {
    pub asset: String,
    #[serde(deserialize_with = "decimal_from_number_or_string")]
    pub total_balance_crypto: Decimal,
    #[serde(deserialize_with = "decimal_from_number_or_string")]
    pub total_balance_fiat: Decimal,
}

impl From<SpotPosition> for Balance {
    fn from(position: SpotPosition) -> Self {
        Balance {
            symbol: position.asset,
            amount: position.total_balance_crypto,
            usd_value: position.total_balance_fiat,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub product_id: String,
    #[serde(default)]
    pub trading_disabled: bool,
}

impl From<ProductResponse> for Product {
    fn from(dto: ProductResponse) -> Self {
        Product {
            product_id: dto.product_id,
            trading_disabled: dto.trading_disabled,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub client_order_id: &'a str,
    pub product_id: &'a str,
    pub side: &'static str,
    pub order_configuration: OrderConfiguration<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retail_portfolio_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct OrderConfiguration<'a> {
    pub market_market_ioc: MarketIoc<'a>,
}

#[derive(Debug, Serialize)]
pub struct MarketIoc<'a> {
    pub base_size: &'a str,
}

impl<'a> CreateOrderRequest<'a> {
    pub fn market_sell(
        client_order_id: &'a str,
        product_id: &'a str,
        base_size: &'a str,
        retail_portfolio_id: Option<&'a str>,
    ) -> Self {
        Self {
            client_order_id,
            product_id,
            side: "SELL",
            order_configuration: OrderConfiguration {
                market_market_ioc: MarketIoc { base_size },
            },
            retail_portfolio_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub success_response: Option<OrderSuccess>,
    #[serde(default)]
    pub error_response: Option<OrderFailure>,
}

#[derive(Debug, Deserialize)]
pub struct OrderSuccess {
    pub order_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFailure {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub error_details: String,
    #[serde(default)]
    pub preview_failure_reason: String,
}

impl OrderFailure {
    pub fn is_invalid_product(&self) -> bool {
        self.error == "INVALID_PRODUCT_ID"
            || self.message.contains("Invalid product_id")
            || self.error_details.contains("Invalid product_id")
    }

    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [
            self.error.as_str(),
            self.message.as_str(),
            self.error_details.as_str(),
            self.preview_failure_reason.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            "unknown failure".to_string()
        } else {
            parts.join(": ")
        }
    }
}

impl CreateOrderResponse {
    pub fn into_result(self, product_id: &str) -> Result<OrderResult> {
        if self.success {
            return self
                .success_response
                .map(|s| OrderResult {
                    order_id: s.order_id,
                })
                .ok_or_else(|| LiquidationError::MalformedResponse {
                    message: format!("order for {} accepted without success_response", product_id),
                });
        }

        let failure = self.error_response.unwrap_or_default();
        if failure.is_invalid_product() {
            return Err(LiquidationError::InvalidProduct {
                product_id: product_id.to_string(),
            });
        }
        Err(LiquidationError::OrderRejected {
            message: failure.describe(),
        })
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

pub fn parse_decimal(text: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
}

/// Coinbase sends balances as JSON numbers in some endpoints and as strings
/// in others.
pub fn decimal_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = match &value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        other => {
            return Err(de::Error::custom(format!(
                "expected a decimal number, got {}",
                other
            )))
        }
    };
    parse_decimal(&text).map_err(de::Error::custom)
}
