use async_trait::async_trait;
use reqwest::Client as HttpClient;
use std::collections::HashMap;

use super::models::{ApiError, CatalogEntry, SimplePrice};
use crate::api::PriceSource;
use crate::config::PipelineConfig;

/// CoinGecko API client for the catalog and simple-price endpoints.
pub struct CoinGeckoClient {
    http_client: HttpClient,
    catalog_url: String,
    price_url: String,
}

impl CoinGeckoClient {
    /// Create a new client with the endpoints and timeout from `config`.
    pub fn new(config: &PipelineConfig) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("coinlake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Request(format!("client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            catalog_url: config.catalog_url.clone(),
            price_url: config.price_url.clone(),
        })
    }

    /// Turn a non-2xx response into an `ApiError::Upstream` with the raw body.
    async fn error_for_status(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ApiError::Upstream { status, body }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    /// GET /coins/list
    ///
    /// Returns every tradable coin id the upstream knows about, in upstream
    /// order. No pagination: the endpoint returns the full catalog at once.
    async fn coins_list(&self) -> Result<Vec<CatalogEntry>, ApiError> {
        let response = self
            .http_client
            .get(&self.catalog_url)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        response
            .json::<Vec<CatalogEntry>>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// GET /simple/price?ids=...&vs_currencies=...
    ///
    /// `ids` is comma-joined into a single query parameter; the caller is
    /// responsible for keeping the chunk within the upstream's id limit.
    /// Coins the upstream cannot price are simply absent from the map.
    async fn simple_price(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<HashMap<String, SimplePrice>, ApiError> {
        let response = self
            .http_client
            .get(&self.price_url)
            .query(&[("ids", ids.join(",").as_str()), ("vs_currencies", vs_currency)])
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("price request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        response
            .json::<HashMap<String, SimplePrice>>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}
