use coinbase_liquidation::core::executor::{ExecutorOptions, RetryPolicy};
use coinbase_liquidation::core::precision::PrecisionTable;
use coinbase_liquidation::core::report::Reporter;
use coinbase_liquidation::core::{Confirmation, RunMode};
use coinbase_liquidation::{
    CoinbaseClient, Credentials, EngineSettings, LiquidationEngine, LiquidationError,
    LocalStorage, Result,
};
use httpmock::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/cdp_test_key.json");

struct Answer(bool);

impl Confirmation for Answer {
    fn confirm(&self, _item_count: usize, _total_usd: Decimal) -> Result<bool> {
        Ok(self.0)
    }
}

fn mock_account(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios");
        then.status(200).json_body(serde_json::json!({
            "portfolios": [{"name": "Default", "uuid": "p-1", "type": "DEFAULT", "deleted": false}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios/p-1");
        then.status(200).json_body(serde_json::json!({
            "breakdown": {
                "spot_positions": [
                    {"asset": "USD", "total_balance_crypto": 100, "total_balance_fiat": 100},
                    {"asset": "BTC", "total_balance_crypto": 0.123456789, "total_balance_fiat": 50.00},
                    {"asset": "USDC", "total_balance_crypto": 50, "total_balance_fiat": 50},
                    {"asset": "ETH", "total_balance_crypto": 0.5, "total_balance_fiat": 1500},
                    {"asset": "XRP", "total_balance_crypto": 12.7, "total_balance_fiat": 5.00},
                    {"asset": "SHIB", "total_balance_crypto": 0.0004, "total_balance_fiat": 0.005},
                    {"asset": "DOGE", "total_balance_crypto": "100.12345", "total_balance_fiat": "12.00"},
                    {"asset": "SOL", "total_balance_crypto": 1.239, "total_balance_fiat": 180}
                ]
            }
        }));
    });
}

fn engine(
    server: &MockServer,
    output: &Path,
    mode: RunMode,
    answer: bool,
) -> LiquidationEngine<CoinbaseClient, LocalStorage, Answer> {
    let credentials = Credentials::from_file(KEY_FILE).unwrap();
    let client =
        CoinbaseClient::new(&credentials, &server.base_url(), Duration::from_secs(5)).unwrap();

    let mut executor = ExecutorOptions::new(mode);
    executor.retry = RetryPolicy {
        max_attempts: 2,
        backoff: Duration::ZERO,
    };
    executor.inter_item_delay = Duration::ZERO;

    LiquidationEngine::new(
        client,
        Reporter::new(
            LocalStorage::new(output.to_str().unwrap().to_string()),
            "coinbase_liquidation_report",
        ),
        Answer(answer),
        PrecisionTable::builtin(),
        EngineSettings {
            min_threshold: dec!(0.01),
            portfolio: None,
            executor,
        },
    )
}

fn read_report(path: &str) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["currency", "amount", "usd_value", "order_id", "status", "timestamp", "error"]
    );
    reader.records().map(|r| r.unwrap()).collect()
}

#[tokio::test]
async fn test_live_run_with_one_rate_limited_item() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_account(&server);

    let mut order_mocks = Vec::new();
    for (product, order_id) in [
        ("BTC-USD", "o-btc"),
        ("ETH-USD", "o-eth"),
        ("DOGE-USD", "o-doge"),
        ("SOL-USD", "o-sol"),
    ] {
        order_mocks.push(server.mock(|when, then| {
            when.method(POST)
                .path("/api/v3/brokerage/orders")
                .body_contains(format!("\"product_id\":\"{}\"", product));
            then.status(200).json_body(serde_json::json!({
                "success": true,
                "success_response": {"order_id": order_id}
            }));
        }));
    }
    let xrp_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/brokerage/orders")
            .body_contains("\"product_id\":\"XRP-USD\"");
        then.status(429)
            .json_body(serde_json::json!({"message": "Too many requests"}));
    });

    let summary = engine(&server, temp_dir.path(), RunMode::Live, true)
        .run()
        .await
        .unwrap();

    for order_mock in &order_mocks {
        order_mock.assert();
    }
    xrp_mock.assert_hits(2);

    assert_eq!(summary.successful, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_usd, dec!(1742));
    let file_name = Path::new(&summary.report_path)
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(file_name.starts_with("coinbase_liquidation_report_live_"));

    let rows = read_report(&summary.report_path);
    assert_eq!(rows.len(), 5);

    let symbols: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(symbols, vec!["BTC", "ETH", "XRP", "DOGE", "SOL"]);

    assert_eq!(&rows[0][1], "0.12345678");
    assert_eq!(&rows[0][3], "o-btc");
    assert_eq!(&rows[0][4], "EXECUTED");

    assert_eq!(&rows[2][1], "12");
    assert_eq!(&rows[2][3], "");
    assert_eq!(&rows[2][4], "FAILED");
    assert!(rows[2][6].contains("Rate limited"));

    assert_eq!(rows.iter().filter(|r| &r[4] == "EXECUTED").count(), 4);
    assert!(rows.iter().all(|r| !r[5].is_empty()));
}

#[tokio::test]
async fn test_trial_run_places_no_orders() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_account(&server);
    let orders = server.mock(|when, then| {
        when.method(POST).path("/api/v3/brokerage/orders");
        then.status(500);
    });

    let summary = engine(&server, temp_dir.path(), RunMode::Trial, false)
        .run()
        .await
        .unwrap();

    orders.assert_hits(0);
    assert_eq!(summary.successful, 5);
    assert_eq!(summary.failed, 0);

    let rows = read_report(&summary.report_path);
    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|r| &r[4] == "TRIAL"));
    assert!(rows.iter().all(|r| r[3].is_empty()));
    assert!(summary.report_path.contains("_trial_"));
}

#[tokio::test]
async fn test_declined_confirmation_places_no_orders() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    mock_account(&server);
    let orders = server.mock(|when, then| {
        when.method(POST).path("/api/v3/brokerage/orders");
        then.status(500);
    });

    let err = engine(&server, temp_dir.path(), RunMode::Live, false)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, LiquidationError::Cancelled));
    assert_eq!(err.exit_code(), 2);
    orders.assert_hits(0);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unreachable_exchange_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios");
        then.status(401).json_body(serde_json::json!({"error": "UNAUTHORIZED", "message": "Unauthorized"}));
    });

    let err = engine(&server, temp_dir.path(), RunMode::Trial, false)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, LiquidationError::HttpStatus { status: 401, .. }));
    assert!(err.is_fatal());
    assert_eq!(err.exit_code(), 1);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
