//! Response models.
//!
//! Each model derives `JsonSchema` so its declared shape can be checked
//! against live responses. Optional fields the API sends as `null` are
//! `Option<T>`: the generated schema lists them as required and nullable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Side {
    #[serde(rename = "A")]
    Ask,
    #[serde(rename = "B")]
    Bid,
}

/// Order type as displayed by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum OrderType {
    Limit,
    Market,
    #[serde(rename = "Stop Market")]
    StopMarket,
    #[serde(rename = "Stop Limit")]
    StopLimit,
    #[serde(rename = "Take Profit Market")]
    TakeProfitMarket,
    #[serde(rename = "Take Profit Limit")]
    TakeProfitLimit,
}

/// Time in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Tif {
    Gtc,
    Ioc,
    Alo,
    FrontendMarket,
    LiquidationMarket,
}

/// Open order with frontend metadata (`frontendOpenOrders`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrontendOrder {
    pub coin: String,
    pub side: Side,
    pub limit_px: String,
    pub sz: String,
    pub oid: u64,
    pub timestamp: u64,
    pub trigger_condition: String,
    pub is_trigger: bool,
    pub trigger_px: String,
    /// Linked TP/SL orders, same shape as the parent.
    pub children: Vec<Value>,
    pub is_position_tpsl: bool,
    pub reduce_only: bool,
    pub order_type: OrderType,
    pub orig_sz: String,
    pub tif: Option<Tif>,
    pub cloid: Option<String>,
}

/// Open order without frontend metadata (`openOrders`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicOrder {
    pub coin: String,
    pub side: Side,
    pub limit_px: String,
    pub sz: String,
    pub oid: u64,
    pub timestamp: u64,
    pub orig_sz: String,
    pub cloid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct L2Level {
    pub px: String,
    pub sz: String,
    /// Number of orders at this level.
    pub n: u32,
}

/// Order book snapshot. `levels` holds bids then asks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct L2Book {
    pub coin: String,
    pub time: u64,
    pub levels: Vec<Vec<L2Level>>,
}

impl L2Book {
    pub fn bids(&self) -> &[L2Level] {
        self.levels.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn asks(&self) -> &[L2Level] {
        self.levels.get(1).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum OkStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DefaultKind {
    #[serde(rename = "default")]
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DefaultResponse {
    #[serde(rename = "type")]
    pub kind: DefaultKind,
}

/// Acknowledgement for exchange actions without a payload:
/// `{"status": "ok", "response": {"type": "default"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuccessResponse {
    pub status: OkStatus,
    pub response: DefaultResponse,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self {
            status: OkStatus::Ok,
            response: DefaultResponse {
                kind: DefaultKind::Default,
            },
        }
    }
}
