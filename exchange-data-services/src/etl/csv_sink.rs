use exchange_core::{ExchangeRecord, CSV_COLUMNS};
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

use crate::error::EtlError;

/// Write a snapshot as CSV: header row, then one row per record in order.
///
/// Rows go to a hidden temp file in the same directory which is renamed
/// over `path` only after it has been fully written and synced, so a
/// failed run never leaves a truncated partition file behind.
///
/// The parent directory must already exist.
pub fn write_snapshot_csv(path: &Path, records: &[ExchangeRecord]) -> Result<(), EtlError> {
    let dir = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => Path::new("."),
    };

    if !dir.is_dir() {
        return Err(EtlError::filesystem(
            path,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory {} does not exist", dir.display()),
            ),
        ));
    }

    let tmp_path = temp_path_for(path);
    tracing::debug!("Writing {} rows to {}", records.len(), tmp_path.display());

    if let Err(e) = write_rows(&tmp_path, records) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(EtlError::filesystem(path, source));
    }

    tracing::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn write_rows(path: &Path, records: &[ExchangeRecord]) -> Result<(), EtlError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| EtlError::from_csv(path, e))?;

    // Explicit header so an empty snapshot still gets one
    writer
        .write_record(CSV_COLUMNS)
        .map_err(|e| EtlError::from_csv(path, e))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| EtlError::from_csv(path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| EtlError::filesystem(path, e.into_error()))?;
    file.sync_all()
        .map_err(|source| EtlError::filesystem(path, source))?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot.csv".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Read a snapshot CSV written by [`write_snapshot_csv`] back into records.
///
/// The header must match the fixed column order exactly.
pub fn read_snapshot_csv(path: &Path) -> Result<Vec<ExchangeRecord>, EtlError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| EtlError::from_csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| EtlError::from_csv(path, e))?
        .clone();
    if !headers.iter().eq(CSV_COLUMNS.iter().copied()) {
        return Err(EtlError::DataFormat(format!(
            "{}: unexpected header {:?}",
            path.display(),
            headers.iter().collect::<Vec<_>>()
        )));
    }

    reader
        .deserialize()
        .collect::<Result<Vec<ExchangeRecord>, _>>()
        .map_err(|e| EtlError::from_csv(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "exchange-csv-sink-{}-{}-{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_records() -> Vec<ExchangeRecord> {
        vec![
            ExchangeRecord {
                id: Some("binance".to_string()),
                name: Some("Binance".to_string()),
                rank: Some(1),
                percent_total_volume: Some(12.5),
                volume_usd: Some(1000000.0),
                trading_pairs: Some(500),
                socket: Some(true),
                exchange_url: Some("https://binance.com".to_string()),
                updated: Some(1700000000000),
            },
            ExchangeRecord {
                id: Some("gdax".to_string()),
                name: Some("Coinbase, Inc.".to_string()),
                rank: None,
                percent_total_volume: Some(3.25),
                volume_usd: None,
                trading_pairs: Some(240),
                socket: Some(false),
                exchange_url: Some("https://pro.coinbase.com/".to_string()),
                updated: Some(1700000000001),
            },
        ]
    }

    #[test]
    fn test_write_header_and_rows() {
        let dir = temp_dir("rows");
        let path = dir.join("20240101.csv");

        write_snapshot_csv(&path, &sample_records()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "id,name,rank,percentTotalVolume,volumeUsd,tradingPairs,socket,exchangeUrl,updated"
        );
        assert_eq!(
            lines[1],
            "binance,Binance,1,12.5,1000000.0,500,true,https://binance.com,1700000000000"
        );
        assert_eq!(
            lines[2],
            "gdax,\"Coinbase, Inc.\",,3.25,,240,false,https://pro.coinbase.com/,1700000000001"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_snapshot_has_header_only() {
        let dir = temp_dir("empty");
        let path = dir.join("empty.csv");

        write_snapshot_csv(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", CSV_COLUMNS.join(",")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = temp_dir("roundtrip");
        let first = dir.join("first.csv");
        let second = dir.join("second.csv");

        write_snapshot_csv(&first, &sample_records()).unwrap();
        let records = read_snapshot_csv(&first).unwrap();
        assert_eq!(records, sample_records());

        write_snapshot_csv(&second, &records).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_overwrite_existing_partition() {
        let dir = temp_dir("overwrite");
        let path = dir.join("same.csv");

        write_snapshot_csv(&path, &sample_records()).unwrap();
        write_snapshot_csv(&path, &sample_records()[..1]).unwrap();

        assert_eq!(read_snapshot_csv(&path).unwrap().len(), 1);

        // No temp files left behind
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let dir = temp_dir("missing");
        let path = dir.join("does-not-exist").join("20240101.csv");

        let err = write_snapshot_csv(&path, &sample_records()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(!path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let dir = temp_dir("header");
        let path = dir.join("other.csv");
        fs::write(&path, "trade_id,ts\n1,2\n").unwrap();

        let err = read_snapshot_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_snapshot_csv(Path::new("/nonexistent/exchange/data.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }
}
