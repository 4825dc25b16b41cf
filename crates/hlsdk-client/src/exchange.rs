//! Client for the `/exchange` endpoint.
//!
//! Accepts actions that are already signed. An answer of
//! `{"status": "err", "response": "<message>"}` arrives with HTTP 200 and is
//! mapped to [`ApiError::Rejected`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::transport::{decode, Endpoint, HttpTransport};
use crate::types::SuccessResponse;

/// ECDSA signature components as the exchange expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub r: String,
    pub s: String,
    pub v: u8,
}

/// Body of an `/exchange` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAction {
    pub action: Value,
    pub nonce: u64,
    pub signature: Signature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_address: Option<String>,
}

impl SignedAction {
    /// Wrap a serializable action with its nonce and signature.
    pub fn new<A: Serialize>(
        action: &A,
        nonce: u64,
        signature: Signature,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            action: serde_json::to_value(action)?,
            nonce,
            signature,
            vault_address: None,
        })
    }

    pub fn for_vault(mut self, vault_address: impl Into<String>) -> Self {
        self.vault_address = Some(vault_address.into());
        self
    }

    fn action_type(&self) -> &str {
        self.action
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
    }
}

/// Client for the `/exchange` endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    transport: HttpTransport,
}

impl ExchangeClient {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Post a signed action that acknowledges with a bare success response.
    pub async fn post_action(&self, signed: &SignedAction) -> Result<SuccessResponse, ApiError> {
        let raw = self.post_action_raw(signed).await?;
        decode(Endpoint::Exchange, raw)
    }

    /// Post a signed action and return the JSON answer once it is known not
    /// to be a rejection.
    pub async fn post_action_raw(&self, signed: &SignedAction) -> Result<Value, ApiError> {
        let raw = self.transport.post_json(Endpoint::Exchange, signed).await?;
        if let Some(message) = rejection(&raw) {
            tracing::warn!(
                action = signed.action_type(),
                nonce = signed.nonce,
                reason = %message,
                "exchange rejected action"
            );
            return Err(ApiError::Rejected {
                endpoint: Endpoint::Exchange.to_string(),
                message,
            });
        }
        Ok(raw)
    }
}

/// The rejection message, if `raw` is an `err` answer.
fn rejection(raw: &Value) -> Option<String> {
    if raw.get("status").and_then(Value::as_str) != Some("err") {
        return None;
    }
    Some(match raw.get("response") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    })
}
