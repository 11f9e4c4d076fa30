pub mod config;
pub mod error;
pub mod etl;

// Re-export commonly used items
pub use config::LoaderConfig;
pub use error::{ErrorKind, EtlError};
pub use etl::{
    flatten_exchanges, read_snapshot_csv, run_pipeline, write_snapshot_csv, ExchangeApiClient,
    ExchangeSnapshotLoader, SnapshotSummary,
};
