//! Contract tests for ExchangeClient.

use hlsdk_client::actions::spot_user;
use hlsdk_client::types::SuccessResponse;
use hlsdk_client::{ApiClient, ApiError, Signature, SignedAction, TransportConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> ApiClient {
    let config = TransportConfig::local(&mock_server.uri()).unwrap();
    ApiClient::new(&config).unwrap()
}

fn signed(opt_out: bool, nonce: u64) -> SignedAction {
    let signature = Signature {
        r: "0x1111".into(),
        s: "0x2222".into(),
        v: 28,
    };
    SignedAction::new(&spot_user(opt_out), nonce, signature).unwrap()
}

#[tokio::test]
async fn post_action_sends_signed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exchange"))
        .and(body_partial_json(json!({
            "action": { "type": "spotUser", "toggleSpotDusting": { "optOut": true } },
            "nonce": 1700000000000u64,
            "signature": { "r": "0x1111", "s": "0x2222", "v": 28 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ok", "response": { "type": "default" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let resp = test_client(&mock_server)
        .exchange()
        .post_action(&signed(true, 1700000000000))
        .await
        .unwrap();
    assert_eq!(resp, SuccessResponse::default());
}

#[tokio::test]
async fn err_status_maps_to_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "err",
            "response": "User or API Wallet does not exist."
        })))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .exchange()
        .post_action(&signed(false, 1))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected { message, .. } => {
            assert_eq!(message, "User or API Wallet does not exist.");
        }
        other => panic!("expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_default_ack_fails_to_decode_as_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "response": { "type": "order", "data": { "statuses": [] } }
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.exchange().post_action(&signed(false, 2)).await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }), "got: {err:?}");

    let raw = client.exchange().post_action_raw(&signed(false, 3)).await.unwrap();
    assert_eq!(raw["response"]["type"], "order");
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exchange"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .exchange()
        .post_action(&signed(true, 4))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, .. }), "got: {err:?}");
}
