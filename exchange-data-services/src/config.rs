use std::path::PathBuf;

/// CoinCap v3 exchange listings endpoint
pub const COINCAP_EXCHANGES_URL: &str = "https://rest.coincap.io/v3/exchanges";

/// Directory that receives one `<partition_key>.csv` per run
pub const DEFAULT_OUTPUT_DIR: &str = "./processed_data/exchange_data";

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub endpoint_url: String,
    pub output_dir: PathBuf,
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            endpoint_url: COINCAP_EXCHANGES_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: format!("exchange-data-services/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
