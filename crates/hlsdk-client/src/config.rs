//! Transport configuration.
//!
//! Defaults point to mainnet. Override via environment variables or explicit
//! construction for testnet and local mock servers.

use url::Url;

/// Mainnet API root.
pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";
/// Testnet API root.
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// API root; `/info` and `/exchange` are resolved against it.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// True when `base_url` is a testnet deployment.
    pub is_testnet: bool,
}

impl TransportConfig {
    pub fn mainnet() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("mainnet", MAINNET_API_URL)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            is_testnet: false,
        })
    }

    pub fn testnet() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("testnet", TESTNET_API_URL)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            is_testnet: true,
        })
    }

    /// Configuration pointing at a local server (for testing).
    pub fn local(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("local", url)?,
            timeout_secs: 5,
            is_testnet: true,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `HLSDK_TESTNET` (`1`/`true` selects testnet; default: mainnet)
    /// - `HLSDK_API_URL` (overrides the network's API root)
    /// - `HLSDK_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let is_testnet = match std::env::var("HLSDK_TESTNET") {
            Ok(raw) => parse_flag("HLSDK_TESTNET", &raw)?,
            Err(_) => false,
        };
        let default = if is_testnet { TESTNET_API_URL } else { MAINNET_API_URL };
        let raw_url = std::env::var("HLSDK_API_URL").unwrap_or_else(|_| default.to_string());

        Ok(Self {
            base_url: parse_url("HLSDK_API_URL", &raw_url)?,
            timeout_secs: std::env::var("HLSDK_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            is_testnet,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn parse_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(var.to_string(), raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid boolean for {0}: {1:?}")]
    InvalidFlag(String, String),
}
