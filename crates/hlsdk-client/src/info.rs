//! Typed client for the `/info` endpoint.
//!
//! | Request `type`       | Method                    | Model                |
//! |----------------------|---------------------------|----------------------|
//! | `frontendOpenOrders` | `frontend_open_orders`    | `Vec<FrontendOrder>` |
//! | `openOrders`         | `open_orders`             | `Vec<BasicOrder>`    |
//! | `l2Book`             | `l2_book`                 | `L2Book`             |
//!
//! The `_raw` variants return the untouched JSON, which is what coverage
//! checks need: a typed round trip would hide fields the model drops.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{decode, Endpoint, HttpTransport};
use crate::types::{BasicOrder, FrontendOrder, L2Book};

/// Body of an `/info` request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest<'a> {
    FrontendOpenOrders {
        user: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        dex: Option<&'a str>,
    },
    OpenOrders {
        user: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        dex: Option<&'a str>,
    },
    L2Book {
        coin: &'a str,
    },
}

/// Client for the `/info` endpoint.
#[derive(Debug, Clone)]
pub struct InfoClient {
    transport: HttpTransport,
}

impl InfoClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Open orders of `user` with frontend metadata. `dex` selects a
    /// builder-deployed dex; `None` is the default dex.
    pub async fn frontend_open_orders(
        &self,
        user: &str,
        dex: Option<&str>,
    ) -> Result<Vec<FrontendOrder>, ApiError> {
        let raw = self.frontend_open_orders_raw(user, dex).await?;
        decode(Endpoint::Info, raw)
    }

    pub async fn frontend_open_orders_raw(
        &self,
        user: &str,
        dex: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.send(&InfoRequest::FrontendOpenOrders { user, dex }).await
    }

    pub async fn open_orders(
        &self,
        user: &str,
        dex: Option<&str>,
    ) -> Result<Vec<BasicOrder>, ApiError> {
        let raw = self.open_orders_raw(user, dex).await?;
        decode(Endpoint::Info, raw)
    }

    pub async fn open_orders_raw(&self, user: &str, dex: Option<&str>) -> Result<Value, ApiError> {
        self.send(&InfoRequest::OpenOrders { user, dex }).await
    }

    pub async fn l2_book(&self, coin: &str) -> Result<L2Book, ApiError> {
        let raw = self.l2_book_raw(coin).await?;
        decode(Endpoint::Info, raw)
    }

    pub async fn l2_book_raw(&self, coin: &str) -> Result<Value, ApiError> {
        self.send(&InfoRequest::L2Book { coin }).await
    }

    /// Send an arbitrary `/info` body, for request types without a model.
    pub async fn request_raw(&self, body: &Value) -> Result<Value, ApiError> {
        self.transport.post_json(Endpoint::Info, body).await
    }

    async fn send(&self, request: &InfoRequest<'_>) -> Result<Value, ApiError> {
        self.transport.post_json(Endpoint::Info, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_bodies_match_wire_format() {
        let user = "0x0000000000000000000000000000000000000001";
        assert_eq!(
            serde_json::to_value(InfoRequest::FrontendOpenOrders { user, dex: None }).unwrap(),
            json!({ "type": "frontendOpenOrders", "user": user })
        );
        assert_eq!(
            serde_json::to_value(InfoRequest::OpenOrders { user, dex: Some("test") }).unwrap(),
            json!({ "type": "openOrders", "user": user, "dex": "test" })
        );
        assert_eq!(
            serde_json::to_value(InfoRequest::L2Book { coin: "BTC" }).unwrap(),
            json!({ "type": "l2Book", "coin": "BTC" })
        );
    }
}
