//! Response models held against recorded responses: every declared branch,
//! enum value and nullable state must show up, except what each test
//! explicitly excuses.

use std::time::Duration;

use hlsdk_client::actions::spot_user;
use hlsdk_client::types::{FrontendOrder, SuccessResponse};
use hlsdk_client::{ApiClient, Signature, SignedAction, TransportConfig};
use hlsdk_coverage::{schema_coverage, CoverageError, Fill, GapKind, HarnessError, IgnoreSpec};
use hlsdk_schema::SchemaPath;
use serde_json::{json, Value};
use tokio::task::JoinSet;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER: &str = "0x0000000000000000000000000000000000000002";

fn order(oid: u64, side: &str, order_type: &str, tif: Value, cloid: Value) -> Value {
    let is_trigger = order_type != "Limit";
    json!({
        "coin": "BTC",
        "side": side,
        "limitPx": "60000.0",
        "sz": "0.1",
        "oid": oid,
        "timestamp": 1700000000000u64 + oid,
        "triggerCondition": if is_trigger { "Price above 61000" } else { "N/A" },
        "isTrigger": is_trigger,
        "triggerPx": if is_trigger { "61000.0" } else { "0.0" },
        "children": [],
        "isPositionTpsl": false,
        "reduceOnly": is_trigger,
        "orderType": order_type,
        "origSz": "0.1",
        "tif": tif,
        "cloid": cloid
    })
}

fn default_dex_orders() -> Value {
    json!([
        order(1, "B", "Limit", json!("Gtc"), json!(null)),
        order(2, "A", "Limit", json!("Alo"), json!("0x00000000000000000000000000000002")),
        order(3, "A", "Stop Market", json!(null), json!(null)),
        order(4, "B", "Stop Limit", json!(null), json!(null)),
        order(5, "A", "Take Profit Market", json!(null), json!(null)),
        order(6, "B", "Take Profit Limit", json!(null), json!(null)),
    ])
}

/// Exclusions for what an account with resting orders cannot produce.
fn frontend_orders_ignore() -> IgnoreSpec {
    IgnoreSpec::new()
        .enum_values("#/items/properties/orderType", [json!("Market")])
        .enum_values(
            "#/items/properties/tif/anyOf/0",
            [json!("Ioc"), json!("FrontendMarket"), json!("LiquidationMarket")],
        )
        .fill("#/items/properties/children", [Fill::NonEmpty])
}

async fn mount_frontend_orders(mock_server: &MockServer, default_dex: Value) {
    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "frontendOpenOrders", "user": USER })))
        .respond_with(ResponseTemplate::new(200).set_body_json(default_dex))
        .mount(mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/info"))
        .and(body_json(json!({ "type": "frontendOpenOrders", "user": USER, "dex": "test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(mock_server)
        .await;
}

async fn fetch_both_dexes(client: &ApiClient) -> Vec<Value> {
    let mut set = JoinSet::new();
    for dex in [None, Some("test")] {
        let info = client.info().clone();
        set.spawn(async move { (dex, info.frontend_open_orders_raw(USER, dex).await) });
    }
    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        let (dex, result) = joined.unwrap();
        results.push((dex, result.unwrap()));
    }
    results.sort_by_key(|(dex, _)| dex.is_some());
    results.into_iter().map(|(_, raw)| raw).collect()
}

#[tokio::test]
async fn frontend_open_orders_cover_their_schema() {
    let mock_server = MockServer::start().await;
    mount_frontend_orders(&mock_server, default_dex_orders()).await;
    let client = ApiClient::new(&TransportConfig::local(&mock_server.uri()).unwrap()).unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    let data = fetch_both_dexes(&client).await;

    let ignore = frontend_orders_ignore();
    let report = schema_coverage::<Vec<FrontendOrder>, _>(&data, Some(&ignore)).unwrap();
    assert!(report.is_complete(), "{report}");
    assert_eq!(report.samples, 2);
    assert!(!report.excused.is_empty());
}

#[tokio::test]
async fn missing_alo_order_is_reported() {
    let mock_server = MockServer::start().await;
    let without_alo = json!([
        order(1, "B", "Limit", json!("Gtc"), json!(null)),
        order(2, "A", "Limit", json!("Gtc"), json!("0x00000000000000000000000000000002")),
        order(3, "A", "Stop Market", json!(null), json!(null)),
        order(4, "B", "Stop Limit", json!(null), json!(null)),
        order(5, "A", "Take Profit Market", json!(null), json!(null)),
        order(6, "B", "Take Profit Limit", json!(null), json!(null)),
    ]);
    mount_frontend_orders(&mock_server, without_alo).await;
    let client = ApiClient::new(&TransportConfig::local(&mock_server.uri()).unwrap()).unwrap();

    let data = fetch_both_dexes(&client).await;
    let err = schema_coverage::<Vec<FrontendOrder>, _>(&data, Some(&frontend_orders_ignore()))
        .unwrap_err();

    let HarnessError::Coverage(CoverageError::Gap(gap)) = err else {
        panic!("expected coverage gap, got {err}");
    };
    let tif = SchemaPath::from("#/items/properties/tif/anyOf/0");
    let at_tif: Vec<&GapKind> = gap.report.gaps_at(&tif).collect();
    assert_eq!(at_tif, vec![&GapKind::EnumValue { value: json!("Alo") }]);
    assert_eq!(gap.report.gaps.len(), 1);
}

#[tokio::test]
async fn spot_user_toggle_acknowledgements_cover_success_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/exchange"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "ok", "response": { "type": "default" } })),
        )
        .expect(2)
        .mount(&mock_server)
        .await;
    let client = ApiClient::new(&TransportConfig::local(&mock_server.uri()).unwrap()).unwrap();

    let signature = Signature {
        r: "0xaaaa".into(),
        s: "0xbbbb".into(),
        v: 27,
    };
    let mut data = Vec::new();
    for (nonce, opt_out) in [(1u64, true), (2u64, false)] {
        let signed = SignedAction::new(&spot_user(opt_out), nonce, signature.clone()).unwrap();
        data.push(client.exchange().post_action(&signed).await.unwrap());
    }

    let report = schema_coverage::<SuccessResponse, _>(&data, None).unwrap();
    assert!(report.is_complete(), "{report}");
}
