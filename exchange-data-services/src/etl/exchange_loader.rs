use std::path::PathBuf;
use tracing;

use super::api_client::ExchangeApiClient;
use super::csv_sink::write_snapshot_csv;
use super::flatten::flatten_exchanges;
use crate::config::LoaderConfig;
use crate::error::EtlError;

/// Result of one snapshot run
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    pub partition_key: String,
    pub output_path: PathBuf,
    pub rows_written: usize,
}

/// Loads the current exchange listings into one CSV partition:
/// 1. Fetches `/v3/exchanges` once with the bearer token
/// 2. Unnests `data` into one record per exchange
/// 3. Writes `<output_dir>/<partition_key>.csv`
pub struct ExchangeSnapshotLoader {
    config: LoaderConfig,
}

impl ExchangeSnapshotLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Path of the partition file for `partition_key`
    pub fn output_path(&self, partition_key: &str) -> PathBuf {
        self.config.output_dir.join(format!("{}.csv", partition_key))
    }

    /// Run the extract-transform-load step for one partition.
    ///
    /// # Arguments
    /// * `partition_key` - Base name of the output file (e.g., a timestamp)
    /// * `api_token` - CoinCap API token
    ///
    /// Any failure aborts the run; no partition file is written unless every
    /// row was fetched and cast successfully.
    pub async fn run(&self, partition_key: &str, api_token: &str) -> Result<SnapshotSummary, EtlError> {
        validate_partition_key(partition_key)?;
        let output_path = self.output_path(partition_key);

        tracing::info!(
            "Starting exchange snapshot for partition {} -> {}",
            partition_key,
            output_path.display()
        );

        // The client lives only for this run
        let client = ExchangeApiClient::new(&self.config)?;
        let document = client.fetch_exchanges(api_token).await?;

        let records = flatten_exchanges(&document)?;
        write_snapshot_csv(&output_path, &records)?;

        tracing::info!(
            "Snapshot {} complete: {} exchanges",
            partition_key,
            records.len()
        );

        Ok(SnapshotSummary {
            partition_key: partition_key.to_string(),
            output_path,
            rows_written: records.len(),
        })
    }
}

impl Default for ExchangeSnapshotLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Run one snapshot with the default endpoint and output directory
pub async fn run_pipeline(partition_key: &str, api_token: &str) -> Result<SnapshotSummary, EtlError> {
    ExchangeSnapshotLoader::default()
        .run(partition_key, api_token)
        .await
}

/// Reject partition keys that would not name a single file inside the
/// output directory.
pub fn validate_partition_key(partition_key: &str) -> Result<(), EtlError> {
    let invalid = partition_key.trim().is_empty()
        || partition_key == "."
        || partition_key == ".."
        || partition_key.contains(['/', '\\', '\0']);

    if invalid {
        return Err(EtlError::InvalidPartitionKey(partition_key.to_string()));
    }
    Ok(())
}
