//! # hlsdk-client: Typed client for the exchange HTTP API
//!
//! Two endpoints, both JSON `POST`:
//! - **`/info`** via [`InfoClient`]: read-only queries (open orders, books).
//! - **`/exchange`** via [`ExchangeClient`]: pre-signed actions.
//!
//! Response models in [`types`] derive `schemars::JsonSchema`, so tests can
//! hold live responses against the declared shapes with `hlsdk-coverage`.
//!
//! ## Scope
//!
//! No signing and no retries: failures propagate on the first attempt.

pub mod actions;
pub mod config;
pub mod error;
pub mod exchange;
pub mod info;
pub mod transport;
pub mod types;

pub use config::{ConfigError, TransportConfig};
pub use error::ApiError;
pub use exchange::{ExchangeClient, Signature, SignedAction};
pub use info::{InfoClient, InfoRequest};
pub use transport::{Endpoint, HttpTransport};

/// Top-level client. Holds one sub-client per endpoint over a shared pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    info: InfoClient,
    exchange: ExchangeClient,
}

impl ApiClient {
    pub fn new(config: &TransportConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            info: InfoClient::new(transport.clone()),
            exchange: ExchangeClient::new(transport),
        })
    }

    pub fn info(&self) -> &InfoClient {
        &self.info
    }

    pub fn exchange(&self) -> &ExchangeClient {
        &self.exchange
    }
}
