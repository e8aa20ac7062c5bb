use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiquidationError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Token signing error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Credential error ({path}): {message}")]
    CredentialError { path: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rate limited by exchange: {message}")]
    RateLimited { message: String },

    #[error("No USD trading pair available for {product_id}")]
    InvalidProduct { product_id: String },

    #[error("Order rejected: {message}")]
    OrderRejected { message: String },

    #[error("Exchange returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed exchange response: {message}")]
    MalformedResponse { message: String },

    #[error("No portfolios found for this API key")]
    NoPortfolios,

    #[error("Portfolio not found: {portfolio_id}")]
    PortfolioNotFound { portfolio_id: String },

    #[error("Liquidation cancelled by user")]
    Cancelled,
}

impl LiquidationError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LiquidationError::RateLimited { .. })
    }

    /// 啟動階段錯誤：在送出任何訂單之前就必須中止
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LiquidationError::CredentialError { .. }
                | LiquidationError::ConfigError { .. }
                | LiquidationError::MissingConfigError { .. }
                | LiquidationError::InvalidConfigValueError { .. }
                | LiquidationError::TomlError(_)
                | LiquidationError::TokenError(_)
                | LiquidationError::ApiError(_)
                | LiquidationError::HttpStatus { .. }
                | LiquidationError::MalformedResponse { .. }
                | LiquidationError::RateLimited { .. }
                | LiquidationError::NoPortfolios
                | LiquidationError::PortfolioNotFound { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LiquidationError::CredentialError { path, .. } => {
                format!("Could not load API credentials from {}", path)
            }
            LiquidationError::ApiError(_) | LiquidationError::HttpStatus { .. } => {
                "Could not reach the exchange".to_string()
            }
            LiquidationError::NoPortfolios => "No portfolios found on this account".to_string(),
            LiquidationError::Cancelled => "Liquidation cancelled, no orders were placed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LiquidationError::CredentialError { .. } | LiquidationError::TokenError(_) => {
                "Check that the CDP key file exists and contains 'name' and 'privateKey'"
            }
            LiquidationError::ApiError(_) | LiquidationError::HttpStatus { .. } => {
                "Check your network connection and API key permissions, then retry"
            }
            LiquidationError::RateLimited { .. } => "Wait a minute before running again",
            LiquidationError::ConfigError { .. }
            | LiquidationError::MissingConfigError { .. }
            | LiquidationError::InvalidConfigValueError { .. }
            | LiquidationError::TomlError(_) => "Fix the command-line options or settings file",
            LiquidationError::NoPortfolios | LiquidationError::PortfolioNotFound { .. } => {
                "Run check-connection to list the portfolios visible to this key"
            }
            LiquidationError::Cancelled => "Re-run with --live and type CONFIRM to proceed",
            _ => "Re-run with --verbose and inspect liquidation.log",
        }
    }

    /// 1: aborted before trading, 2: cancelled at the prompt,
    /// 3: failed after orders may have been sent (e.g. report write).
    pub fn exit_code(&self) -> i32 {
        match self {
            e if e.is_fatal() => 1,
            LiquidationError::Cancelled => 2,
            _ => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, LiquidationError>;
