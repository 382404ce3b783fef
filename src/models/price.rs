use chrono::{DateTime, Utc};

/// One observed spot price for one coin.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Opaque coin id from the upstream catalog, e.g. "bitcoin".
    pub coin: String,
    /// Spot price in the quote currency; `None` when the upstream returned
    /// the coin without a quote.
    pub price_usd: Option<f64>,
    /// UTC time the chunk containing this record was fetched.
    pub observed_at: DateTime<Utc>,
}

/// The full set of records produced by one pipeline run.
///
/// Records are kept in insertion order so the snapshot serializes
/// deterministically. Coins whose chunk failed are simply absent;
/// `skipped_chunks` is the only visibility into how much was lost.
#[derive(Debug, Clone, Default)]
pub struct PriceBatch {
    pub records: Vec<PriceRecord>,
    pub skipped_chunks: usize,
}

impl PriceBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
