//! Integration test: trees built from `schemars`-generated schemas.
//!
//! Response models in the client crate derive `JsonSchema`; these tests pin
//! down the tree shape the provider produces for the constructs those
//! models use (renamed fields, unit enums, `Option`, `Vec`, nested structs), as
//! serialized.

use hlsdk_schema::{schema_for, ConformanceValidator, JsonType, NodeKind, SchemaNode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize, JsonSchema)]
enum Side {
    A,
    B,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct Level {
    px: String,
    sz: String,
    n: u32,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct Fill {
    coin: String,
    side: Side,
    closed_pnl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    builder_fee: Option<String>,
    tags: Vec<String>,
    best: Level,
}

fn property<'a>(node: &'a SchemaNode, name: &str) -> &'a hlsdk_schema::Property {
    let NodeKind::Object(shape) = &node.kind else {
        panic!("expected object at {}", node.path)
    };
    shape
        .property(name)
        .unwrap_or_else(|| panic!("missing property {name} at {}", node.path))
}

#[test]
fn struct_fields_follow_serde_names() {
    let described = schema_for::<Fill>().unwrap();
    let root = &described.root;
    assert!(root.path.is_root());

    let closed_pnl = property(root, "closedPnl");
    assert!(closed_pnl.required);
    assert!(closed_pnl.node.types.contains(&JsonType::Null));
    assert!(closed_pnl.node.types.contains(&JsonType::String));
    assert_eq!(closed_pnl.node.path.to_string(), "#/properties/closedPnl");

    assert!(property(root, "coin").required);
}

#[test]
fn option_fields_are_optional_only_when_skipped() {
    let described = schema_for::<Fill>().unwrap();
    let builder_fee = property(&described.root, "builderFee");
    assert!(!builder_fee.required);
    assert!(builder_fee.node.types.contains(&JsonType::String));

    let validator = ConformanceValidator::new(&described.document).unwrap();
    let without_pnl = json!({
        "coin": "BTC",
        "side": "A",
        "tags": [],
        "best": { "px": "1", "sz": "2", "n": 3 }
    });
    assert!(validator.validate(&without_pnl).is_err());
}

#[test]
fn unit_enum_is_inlined_as_enum_node() {
    let described = schema_for::<Fill>().unwrap();
    let side = property(&described.root, "side");
    assert_eq!(side.node.path.to_string(), "#/properties/side");
    match &side.node.kind {
        NodeKind::Enum(values) => assert_eq!(values, &vec![json!("A"), json!("B")]),
        other => panic!("expected enum, got {other:?}"),
    }
}

#[test]
fn vec_and_nested_struct_paths() {
    let described = schema_for::<Fill>().unwrap();
    let tags = property(&described.root, "tags");
    let NodeKind::Array(items) = &tags.node.kind else { panic!("expected array") };
    assert_eq!(items.path.to_string(), "#/properties/tags/items");
    assert_eq!(items.types, vec![JsonType::String]);

    let best = property(&described.root, "best");
    let n = property(&best.node, "n");
    assert_eq!(n.node.path.to_string(), "#/properties/best/properties/n");
    assert_eq!(n.node.types, vec![JsonType::Integer]);
}

#[test]
fn top_level_vec_roots_at_items() {
    let described = schema_for::<Vec<Level>>().unwrap();
    let NodeKind::Array(items) = &described.root.kind else { panic!("expected array") };
    assert_eq!(items.path.to_string(), "#/items");
    assert_eq!(property(items, "px").node.path.to_string(), "#/items/properties/px");
}

#[test]
fn generated_document_validates_samples() {
    let described = schema_for::<Fill>().unwrap();
    let validator = ConformanceValidator::new(&described.document).unwrap();
    validator
        .validate(&json!({
            "coin": "BTC",
            "side": "B",
            "closedPnl": null,
            "tags": [],
            "best": { "px": "1", "sz": "2", "n": 3 }
        }))
        .unwrap();
    assert!(validator
        .validate(&json!({ "coin": "BTC", "side": "C", "tags": [], "best": {} }))
        .is_err());
}

#[test]
fn generation_is_deterministic() {
    let a = schema_for::<Fill>().unwrap();
    let b = schema_for::<Fill>().unwrap();
    assert_eq!(a.document, b.document);
    assert_eq!(a.root, b.root);
}
