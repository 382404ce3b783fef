use serde::Deserialize;
use thiserror::Error;

/// One entry from GET /coins/list. Only `id` is consumed downstream; the
/// other fields are kept so a full catalog dump deserializes cleanly.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Per-coin payload from GET /simple/price: `{"usd": 50000.0}`.
/// The quoted field may be missing when the upstream has no price.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SimplePrice {
    #[serde(default)]
    pub usd: Option<f64>,
}

/// Error type for CoinGecko API operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Non-2xx HTTP response, with status and raw body for the log.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    /// Network-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(String),
    /// 2xx response whose body did not match the expected shape.
    #[error("failed to parse response: {0}")]
    Deserialization(String),
}
