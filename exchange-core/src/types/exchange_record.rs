use crate::types::TimestampMS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output column order of an exchange snapshot CSV.
///
/// Matches the serialized field order of [`ExchangeRecord`].
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "rank",
    "percentTotalVolume",
    "volumeUsd",
    "tradingPairs",
    "socket",
    "exchangeUrl",
    "updated",
];

/// One exchange listing, flattened from the `data` array of the
/// `/v3/exchanges` response.
///
/// Every column is nullable: an absent or `null` source value is carried as
/// `None` and written as an empty CSV cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    // ═══════════════════════════════════════════════════
    // IDENTIFICATION
    // ═══════════════════════════════════════════════════
    pub id: Option<String>, // source field `exchangeId`
    pub name: Option<String>,
    pub rank: Option<i32>,

    // ═══════════════════════════════════════════════════
    // VOLUME
    // ═══════════════════════════════════════════════════
    pub percent_total_volume: Option<f64>,
    pub volume_usd: Option<f64>,
    pub trading_pairs: Option<i32>,

    // ═══════════════════════════════════════════════════
    // METADATA
    // ═══════════════════════════════════════════════════
    pub socket: Option<bool>,
    pub exchange_url: Option<String>,
    pub updated: Option<TimestampMS>,
}

impl ExchangeRecord {
    /// Create a record with only the identifier set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// `updated` as a UTC datetime, if present and in range
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated.and_then(DateTime::from_timestamp_millis)
    }
}
