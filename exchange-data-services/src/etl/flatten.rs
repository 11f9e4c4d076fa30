use exchange_core::ExchangeRecord;
use serde_json::{Map, Value};
use tracing;

use super::cast;
use crate::error::EtlError;

/// Unnest the `data` array of an exchanges response into one record per
/// element, preserving API order.
///
/// # Arguments
/// * `document` - Parsed response body, shaped `{ "data": [ {...}, ... ] }`
///
/// # Returns
/// One [`ExchangeRecord`] per array element, or the first cast failure
pub fn flatten_exchanges(document: &Value) -> Result<Vec<ExchangeRecord>, EtlError> {
    let data = document
        .get("data")
        .ok_or_else(|| EtlError::DataFormat("response has no `data` field".to_string()))?;

    let entries = data.as_array().ok_or_else(|| {
        EtlError::DataFormat(format!("`data` is not an array (found {})", json_type(data)))
    })?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(row, entry)| {
            let fields = entry.as_object().ok_or_else(|| {
                EtlError::DataFormat(format!(
                    "data[{}] is not an object (found {})",
                    row,
                    json_type(entry)
                ))
            })?;
            flatten_entry(row, fields)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Flattened {} exchange entries", records.len());

    Ok(records)
}

fn flatten_entry(row: usize, fields: &Map<String, Value>) -> Result<ExchangeRecord, EtlError> {
    Ok(ExchangeRecord {
        id: cast::to_string(row, "exchangeId", fields.get("exchangeId"))?,
        name: cast::to_string(row, "name", fields.get("name"))?,
        rank: cast::to_i32(row, "rank", fields.get("rank"))?,
        percent_total_volume: cast::to_f64(
            row,
            "percentTotalVolume",
            fields.get("percentTotalVolume"),
        )?,
        volume_usd: cast::to_f64(row, "volumeUsd", fields.get("volumeUsd"))?,
        trading_pairs: cast::to_i32(row, "tradingPairs", fields.get("tradingPairs"))?,
        socket: cast::to_bool(row, "socket", fields.get("socket"))?,
        exchange_url: cast::to_string(row, "exchangeUrl", fields.get("exchangeUrl"))?,
        updated: cast::to_i64(row, "updated", fields.get("updated"))?,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
