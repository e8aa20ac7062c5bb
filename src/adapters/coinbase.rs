use crate::adapters::dto::{
    ApiErrorBody, BreakdownResponse, CreateOrderRequest, CreateOrderResponse, PortfoliosResponse,
    ProductResponse,
};
use crate::config::credentials::Credentials;
use crate::domain::model::{Balance, OrderResult, Portfolio, Product};
use crate::domain::ports::Exchange;
use crate::utils::error::{LiquidationError, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.coinbase.com";

const API_PREFIX: &str = "/api/v3/brokerage";
const JWT_TTL_SECS: i64 = 120;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    sub: &'a str,
    iss: &'static str,
    nbf: i64,
    exp: i64,
    uri: String,
}

/// Authenticated client for the Coinbase Advanced Trade REST API.
pub struct CoinbaseClient {
    client: Client,
    base_url: Url,
    key_name: String,
    signing_key: EncodingKey,
}

impl CoinbaseClient {
    pub fn new(credentials: &Credentials, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| LiquidationError::InvalidConfigValueError {
            field: "exchange.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            key_name: credentials.key_name().to_string(),
            signing_key: credentials.signing_key()?,
        })
    }

    /// Short-lived ES256 token bound to one method and path.
    fn bearer_token(&self, method: &Method, path: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let host = self.base_url.host_str().unwrap_or_default();
        let claims = Claims {
            sub: &self.key_name,
            iss: "cdp",
            nbf: now,
            exp: now + JWT_TTL_SECS,
            uri: format!("{} {}{}", method, host, path),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_name.clone());
        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| LiquidationError::ConfigError {
                message: format!("invalid request path {}: {}", path, e),
            })?;
        let token = self.bearer_token(&method, path)?;

        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LiquidationError::RateLimited {
                message: error_message(&text),
            });
        }
        if !status.is_success() {
            return Err(LiquidationError::HttpStatus {
                status: status.as_u16(),
                body: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| LiquidationError::MalformedResponse {
            message: format!("{}: {}", path, e),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, path, None).await
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl Exchange for CoinbaseClient {
    async fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        let response: PortfoliosResponse = self.get(&format!("{}/portfolios", API_PREFIX)).await?;
        Ok(response
            .portfolios
            .into_iter()
            .filter(|p| !p.deleted)
            .map(Portfolio::from)
            .collect())
    }

    async fn portfolio_balances(&self, portfolio_id: &str) -> Result<Vec<Balance>> {
        let response: BreakdownResponse = self
            .get(&format!("{}/portfolios/{}", API_PREFIX, portfolio_id))
            .await?;
        Ok(response
            .breakdown
            .spot_positions
            .into_iter()
            .map(Balance::from)
            .collect())
    }

    async fn get_product(&self, product_id: &str) -> Result<Product> {
        let result: Result<ProductResponse> = self
            .get(&format!("{}/products/{}", API_PREFIX, product_id))
            .await;
        match result {
            Ok(product) => Ok(product.into()),
            Err(LiquidationError::HttpStatus { status, .. }) if status == 404 || status == 400 => {
                Err(LiquidationError::InvalidProduct {
                    product_id: product_id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn market_sell(
        &self,
        product_id: &str,
        base_size: &str,
        client_order_id: &str,
        portfolio_id: Option<&str>,
    ) -> Result<OrderResult> {
        let body =
            CreateOrderRequest::market_sell(client_order_id, product_id, base_size, portfolio_id);
        let response: CreateOrderResponse = self
            .request(Method::POST, &format!("{}/orders", API_PREFIX), Some(&body))
            .await
            .map_err(|e| match e {
                LiquidationError::HttpStatus { body, .. } if body.contains("Invalid product_id") => {
                    LiquidationError::InvalidProduct {
                        product_id: product_id.to_string(),
                    }
                }
                other => other,
            })?;
        tracing::debug!("Order response for {}: {:?}", product_id, response);
        response.into_result(product_id)
    }
}
