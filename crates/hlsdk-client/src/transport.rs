//! HTTP transport shared by the info and exchange clients.
//!
//! Every call is a JSON `POST` to one of two endpoints. Non-2xx answers are
//! surfaced as [`ApiError::Status`] with the body text; nothing is retried.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ConfigError, TransportConfig};
use crate::error::ApiError;

/// The two API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Info,
    Exchange,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Exchange => "exchange",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POST /{}", self.path())
    }
}

/// Pooled `reqwest` client bound to one API root. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    info_url: Url,
    exchange_url: Url,
    is_testnet: bool,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            info_url: join(&config.base_url, Endpoint::Info)?,
            exchange_url: join(&config.base_url, Endpoint::Exchange)?,
            is_testnet: config.is_testnet,
        })
    }

    pub fn is_testnet(&self) -> bool {
        self.is_testnet
    }

    pub fn url(&self, endpoint: Endpoint) -> &Url {
        match endpoint {
            Endpoint::Info => &self.info_url,
            Endpoint::Exchange => &self.exchange_url,
        }
    }

    /// POST `body` as JSON and parse the response body as JSON.
    pub async fn post_json<B>(&self, endpoint: Endpoint, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let name = endpoint.to_string();
        tracing::debug!(endpoint = %name, url = %self.url(endpoint), "sending request");

        let resp = self
            .http
            .post(self.url(endpoint).clone())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: name.clone(),
                source: e,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ApiError::Http {
            endpoint: name.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: name,
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::debug!(endpoint = %name, status = status.as_u16(), bytes = text.len(), "response received");
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialization {
            endpoint: name,
            source: e,
        })
    }
}

fn join(base: &Url, endpoint: Endpoint) -> Result<Url, ApiError> {
    base.join(endpoint.path()).map_err(|e| {
        ApiError::Config(ConfigError::InvalidUrl(
            base.to_string(),
            e.to_string(),
        ))
    })
}

/// Decode a raw response into a typed model, attributing failures to `endpoint`.
pub(crate) fn decode<T>(endpoint: Endpoint, value: Value) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization {
        endpoint: endpoint.to_string(),
        source: e,
    })
}
