use coinbase_liquidation::core::Exchange;
use coinbase_liquidation::{CoinbaseClient, Credentials, LiquidationError};
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use std::time::Duration;

const KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/cdp_test_key.json");

fn client_for(server: &MockServer) -> CoinbaseClient {
    let credentials = Credentials::from_file(KEY_FILE).unwrap();
    CoinbaseClient::new(&credentials, &server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_portfolios_skips_deleted() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v3/brokerage/portfolios")
            .header_exists("authorization");
        then.status(200).json_body(serde_json::json!({
            "portfolios": [
                {"name": "Old", "uuid": "p-0", "type": "CONSUMER", "deleted": true},
                {"name": "Default", "uuid": "p-1", "type": "DEFAULT", "deleted": false}
            ]
        }));
    });

    let portfolios = client_for(&server).list_portfolios().await.unwrap();

    api_mock.assert();
    assert_eq!(portfolios.len(), 1);
    assert_eq!(portfolios[0].uuid, "p-1");
    assert_eq!(portfolios[0].name, "Default");
}

#[tokio::test]
async fn test_portfolio_balances_parse_breakdown() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios/p-1");
        then.status(200).json_body(serde_json::json!({
            "breakdown": {
                "portfolio": {"name": "Default", "uuid": "p-1"},
                "spot_positions": [
                    {"asset": "BTC", "account_uuid": "a-1", "total_balance_fiat": 50.0, "total_balance_crypto": 0.123456789},
                    {"asset": "USDC", "account_uuid": "a-2", "total_balance_fiat": "25.5", "total_balance_crypto": "25.5"}
                ]
            }
        }));
    });

    let balances = client_for(&server).portfolio_balances("p-1").await.unwrap();

    api_mock.assert();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].symbol, "BTC");
    assert_eq!(balances[0].amount, dec!(0.123456789));
    assert_eq!(balances[0].usd_value, dec!(50));
    assert_eq!(balances[1].usd_value, dec!(25.5));
}

#[tokio::test]
async fn test_malformed_breakdown_fails_fast() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios/p-1");
        then.status(200).json_body(serde_json::json!({
            "breakdown": {"spot_positions": [{"asset": "ETH", "total_balance_fiat": 10}]}
        }));
    });

    let err = client_for(&server)
        .portfolio_balances("p-1")
        .await
        .unwrap_err();

    assert!(matches!(err, LiquidationError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_rate_limit_and_server_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios");
        then.status(429)
            .json_body(serde_json::json!({"error": "RATE_LIMIT_EXCEEDED", "message": "Too many requests"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/portfolios/p-1");
        then.status(500).body("internal error");
    });

    let client = client_for(&server);

    let err = client.list_portfolios().await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.to_string(), "Rate limited by exchange: Too many requests");

    let err = client.portfolio_balances("p-1").await.unwrap_err();
    match err {
        LiquidationError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_product() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/products/BTC-USD");
        then.status(200).json_body(serde_json::json!({
            "product_id": "BTC-USD",
            "price": "65000.01",
            "base_increment": "0.00000001",
            "trading_disabled": false
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v3/brokerage/products/NOPE-USD");
        then.status(404)
            .json_body(serde_json::json!({"error": "NOT_FOUND", "message": "ProductID is invalid"}));
    });

    let client = client_for(&server);

    let product = client.get_product("BTC-USD").await.unwrap();
    assert_eq!(product.product_id, "BTC-USD");
    assert!(!product.trading_disabled);

    let err = client.get_product("NOPE-USD").await.unwrap_err();
    assert!(matches!(err, LiquidationError::InvalidProduct { .. }));
}

#[tokio::test]
async fn test_market_sell_success() {
    let server = MockServer::start();
    let order_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/brokerage/orders")
            .header_exists("authorization")
            .body_contains("\"product_id\":\"ETH-USD\"")
            .body_contains("\"side\":\"SELL\"")
            .body_contains("\"market_market_ioc\":{\"base_size\":\"0.5\"}");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "success_response": {
                "order_id": "0000-1111",
                "product_id": "ETH-USD",
                "side": "SELL",
                "client_order_id": "liquidation_ETH_1"
            }
        }));
    });

    let result = client_for(&server)
        .market_sell("ETH-USD", "0.5", "liquidation_ETH_1", None)
        .await
        .unwrap();

    order_mock.assert();
    assert_eq!(result.order_id, "0000-1111");
}

#[tokio::test]
async fn test_market_sell_rejections() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/brokerage/orders")
            .body_contains("ETH-USD");
        then.status(200).json_body(serde_json::json!({
            "success": false,
            "error_response": {
                "error": "INSUFFICIENT_FUND",
                "message": "Insufficient balance in source account"
            }
        }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/brokerage/orders")
            .body_contains("FAKE-USD");
        then.status(400).json_body(serde_json::json!({
            "error": "INVALID_ARGUMENT",
            "message": "Invalid product_id"
        }));
    });

    let client = client_for(&server);

    let err = client
        .market_sell("ETH-USD", "0.5", "cid-1", None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Order rejected: INSUFFICIENT_FUND: Insufficient balance in source account"
    );

    let err = client
        .market_sell("FAKE-USD", "1", "cid-2", None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No USD trading pair available for FAKE-USD");
}

#[tokio::test]
async fn test_market_sell_targets_selected_portfolio() {
    let server = MockServer::start();
    let order_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v3/brokerage/orders")
            .body_contains("\"retail_portfolio_id\":\"p-2\"");
        then.status(200).json_body(serde_json::json!({
            "success": true,
            "success_response": {"order_id": "o-2"}
        }));
    });

    let result = client_for(&server)
        .market_sell("BTC-USD", "0.001", "cid-3", Some("p-2"))
        .await
        .unwrap();

    order_mock.assert();
    assert_eq!(result.order_id, "o-2");
}
