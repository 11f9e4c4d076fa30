use anyhow::{Context, Result};
use clap::Parser;
use exchange_data_services::config::{COINCAP_EXCHANGES_URL, DEFAULT_OUTPUT_DIR};
use exchange_data_services::{ExchangeSnapshotLoader, LoaderConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CoinCap Exchange Snapshot CLI
///
/// Fetches the current exchange listings from the CoinCap API, flattens them
/// into a fixed tabular schema, and writes them to
/// `<output-dir>/<timestamp>.csv`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Timestamp for the partition file name (e.g., "20240101")
    timestamp: String,

    /// CoinCap API token
    api_token: String,

    /// Exchanges endpoint URL
    #[arg(long, default_value = COINCAP_EXCHANGES_URL)]
    endpoint: String,

    /// Directory receiving the partition file (must exist)
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            endpoint_url: self.endpoint.clone(),
            output_dir: self.output_dir.clone(),
            ..LoaderConfig::default()
        }
    }

    /// Filter used when RUST_LOG is not set
    fn default_filter(&self) -> String {
        format!(
            "exchange_ingest={},exchange_data_services={}",
            self.log_level, self.log_level
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.default_filter())))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!("CoinCap exchange snapshot");
    info!("Configuration:");
    info!("  Partition: {}", args.timestamp);
    info!("  Endpoint: {}", args.endpoint);
    info!("  Output dir: {}", args.output_dir.display());

    let loader = ExchangeSnapshotLoader::new(args.loader_config());
    let summary = loader
        .run(&args.timestamp, &args.api_token)
        .await
        .with_context(|| format!("exchange snapshot for partition {} failed", args.timestamp))?;

    info!(
        "✅ Wrote {} exchanges to {}",
        summary.rows_written,
        summary.output_path.display()
    );

    Ok(())
}
