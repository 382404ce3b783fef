use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CATALOG_URL: &str = "https://api.coingecko.com/api/v3/coins/list";
const DEFAULT_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Runtime configuration for a pipeline run.
///
/// Every field can be overridden through the environment (a `.env` file is
/// honored); defaults match the public CoinGecko API and the production
/// datalake bucket.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Endpoint returning the full list of supported coin ids.
    pub catalog_url: String,
    /// Endpoint returning spot prices for a comma-joined id list.
    pub price_url: String,
    /// Maximum number of ids per price request.
    pub chunk_size: usize,
    /// Minimum spacing between consecutive price requests.
    pub rate_limit_delay: Duration,
    /// Quote currency passed as `vs_currencies`.
    pub quote_currency: String,
    /// Destination S3 bucket.
    pub bucket: String,
    /// Key prefix inside the bucket, e.g. "hourly/".
    pub prefix: String,
    /// Directory where the local snapshot is written before upload.
    pub snapshot_dir: PathBuf,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            price_url: DEFAULT_PRICE_URL.to_string(),
            chunk_size: 250,
            rate_limit_delay: Duration::from_millis(1000),
            quote_currency: "usd".to_string(),
            bucket: "crypto-datalake-01".to_string(),
            prefix: "hourly/".to_string(),
            snapshot_dir: PathBuf::from("."),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl PipelineConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset. Numeric variables that fail to parse are an error
    /// rather than silently ignored.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("COINLAKE_CATALOG_URL") {
            config.catalog_url = v;
        }
        if let Ok(v) = std::env::var("COINLAKE_PRICE_URL") {
            config.price_url = v;
        }
        if let Ok(v) = std::env::var("COINLAKE_CHUNK_SIZE") {
            let n: usize = v
                .parse()
                .map_err(|_| format!("COINLAKE_CHUNK_SIZE must be a positive integer, got '{}'", v))?;
            if n == 0 {
                return Err("COINLAKE_CHUNK_SIZE must be at least 1".to_string());
            }
            config.chunk_size = n;
        }
        if let Ok(v) = std::env::var("COINLAKE_RATE_LIMIT_MS") {
            let ms: u64 = v
                .parse()
                .map_err(|_| format!("COINLAKE_RATE_LIMIT_MS must be an integer, got '{}'", v))?;
            config.rate_limit_delay = Duration::from_millis(ms);
        }
        if let Ok(v) = std::env::var("COINLAKE_QUOTE_CURRENCY") {
            config.quote_currency = v.to_lowercase();
        }
        if let Ok(v) = std::env::var("COINLAKE_S3_BUCKET") {
            config.bucket = v;
        }
        if let Ok(v) = std::env::var("COINLAKE_S3_PREFIX") {
            config.prefix = v;
        }
        if let Ok(v) = std::env::var("COINLAKE_SNAPSHOT_DIR") {
            config.snapshot_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("COINLAKE_HTTP_TIMEOUT_SECS") {
            let secs: u64 = v
                .parse()
                .map_err(|_| format!("COINLAKE_HTTP_TIMEOUT_SECS must be an integer, got '{}'", v))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
