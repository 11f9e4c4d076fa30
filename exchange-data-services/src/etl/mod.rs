pub mod api_client;
pub mod cast;
pub mod csv_sink;
pub mod exchange_loader;
pub mod flatten;

// Re-export commonly used items
pub use api_client::ExchangeApiClient;
pub use csv_sink::{read_snapshot_csv, write_snapshot_csv};
pub use exchange_loader::{run_pipeline, validate_partition_key, ExchangeSnapshotLoader, SnapshotSummary};
pub use flatten::flatten_exchanges;
