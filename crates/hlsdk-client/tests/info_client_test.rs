//! Contract tests for InfoClient.
//!
//! A wiremock server stands in for the `/info` endpoint; each test pins the
//! request body the client sends and the model it decodes.

use hlsdk_client::types::{OrderType, Side, Tif};
use hlsdk_client::{ApiClient, ApiError, TransportConfig};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "0x0000000000000000000000000000000000000001";

fn test_client(mock_server: &MockServer) -> ApiClient {
    let config = TransportConfig::local(&mock_server.uri()).unwrap();
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn frontend_open_orders_sends_type_and_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "frontendOpenOrders", "user": USER })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "coin": "BTC",
            "side": "A",
            "limitPx": "64000.0",
            "sz": "0.01",
            "oid": 42,
            "timestamp": 1700000000000u64,
            "triggerCondition": "N/A",
            "isTrigger": false,
            "triggerPx": "0.0",
            "children": [],
            "isPositionTpsl": false,
            "reduceOnly": false,
            "orderType": "Limit",
            "origSz": "0.01",
            "tif": "Gtc",
            "cloid": null
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let orders = test_client(&mock_server)
        .info()
        .frontend_open_orders(USER, None)
        .await
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, Side::Ask);
    assert_eq!(orders[0].order_type, OrderType::Limit);
    assert_eq!(orders[0].tif, Some(Tif::Gtc));
}

#[tokio::test]
async fn frontend_open_orders_forwards_dex() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "frontendOpenOrders", "user": USER, "dex": "test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let raw = test_client(&mock_server)
        .info()
        .frontend_open_orders_raw(USER, Some("test"))
        .await
        .unwrap();
    assert_eq!(raw, json!([]));
}

#[tokio::test]
async fn open_orders_decodes_basic_orders() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "openOrders", "user": USER })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "coin": "ETH",
            "side": "B",
            "limitPx": "1800.5",
            "sz": "1.0",
            "oid": 7,
            "timestamp": 1700000000001u64,
            "origSz": "2.0",
            "cloid": "0x00000000000000000000000000000001"
        }])))
        .mount(&mock_server)
        .await;

    let orders = test_client(&mock_server).info().open_orders(USER, None).await.unwrap();
    assert_eq!(orders[0].side, Side::Bid);
    assert_eq!(orders[0].cloid.as_deref(), Some("0x00000000000000000000000000000001"));
}

#[tokio::test]
async fn l2_book_decodes_levels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "l2Book", "coin": "SOL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coin": "SOL",
            "time": 1700000000002u64,
            "levels": [
                [{ "px": "150.1", "sz": "10", "n": 2 }],
                [{ "px": "150.2", "sz": "4", "n": 1 }, { "px": "150.3", "sz": "9", "n": 5 }]
            ]
        })))
        .mount(&mock_server)
        .await;

    let book = test_client(&mock_server).info().l2_book("SOL").await.unwrap();
    assert_eq!(book.bids().len(), 1);
    assert_eq!(book.asks()[1].n, 5);
}

#[tokio::test]
async fn request_raw_passes_body_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "meta" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "universe": [] })))
        .mount(&mock_server)
        .await;

    let raw = test_client(&mock_server)
        .info()
        .request_raw(&json!({ "type": "meta" }))
        .await
        .unwrap();
    assert_eq!(raw, json!({ "universe": [] }));
}

#[tokio::test]
async fn non_2xx_maps_to_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .info()
        .frontend_open_orders(USER, None)
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body, endpoint } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
            assert_eq!(endpoint, "POST /info");
        }
        other => panic!("expected Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn unexpected_shape_maps_to_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .info()
        .frontend_open_orders(USER, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }), "got: {err:?}");
}
