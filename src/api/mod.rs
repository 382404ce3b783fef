pub mod coingecko;

use async_trait::async_trait;
use std::collections::HashMap;

use self::coingecko::models::{ApiError, CatalogEntry, SimplePrice};

/// Upstream price source capability.
///
/// The pipeline only ever needs these two calls; keeping them behind a trait
/// lets the services run against a scripted stub in tests.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the full catalog of supported coin ids.
    async fn coins_list(&self) -> Result<Vec<CatalogEntry>, ApiError>;

    /// Fetch spot prices for up to one chunk of ids against a quote currency.
    /// Ids absent from the returned map were not priced by the upstream.
    async fn simple_price(
        &self,
        ids: &[String],
        vs_currency: &str,
    ) -> Result<HashMap<String, SimplePrice>, ApiError>;
}
