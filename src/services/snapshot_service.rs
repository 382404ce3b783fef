use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::models::price::PriceBatch;
use crate::models::snapshot::{artifact_name, SnapshotArtifact};
use crate::utils::errors::PipelineError;

/// Serialize the batch to a CSV snapshot named after the UTC hour of `at`.
///
/// Column order matches the warehouse table loader: price first, then coin,
/// then timestamp. Rows are written in batch insertion order with no sorting
/// or dedup. An existing same-hour file is overwritten. Filesystem errors
/// are fatal and propagate unchanged.
pub fn write_snapshot(
    batch: &PriceBatch,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<SnapshotArtifact, PipelineError> {
    let name = artifact_name(at);
    let path = dir.join(&name);

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "price_usd,coin,timestamp")?;
    for record in &batch.records {
        let price = match record.price_usd {
            Some(p) => p.to_string(),
            None => String::new(),
        };
        writeln!(
            writer,
            "{},{},{}",
            price,
            record.coin,
            record.observed_at.format("%Y-%m-%d %H:%M:%S%.6f")
        )?;
    }
    writer.flush()?;

    info!("Price data saved to {}", path.display());
    Ok(SnapshotArtifact { name, path })
}
