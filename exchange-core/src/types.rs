pub mod exchange_record;

// Re-export common types
pub use exchange_record::{ExchangeRecord, CSV_COLUMNS};

/// Timestamp in milliseconds since Unix epoch
pub type TimestampMS = i64;
