use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing;

use crate::config::LoaderConfig;
use crate::error::EtlError;

/// Bytes of a rejected response body echoed into error messages
const BODY_PREVIEW_LEN: usize = 200;

/// Client for the CoinCap exchanges endpoint.
///
/// The whole document is fetched once into memory and parsed locally, so a
/// single logical read never re-requests the (live, mutating) endpoint.
pub struct ExchangeApiClient {
    client: Client,
    endpoint_url: String,
}

impl ExchangeApiClient {
    /// Build a client for the endpoint named in `config`
    pub fn new(config: &LoaderConfig) -> Result<Self, EtlError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| EtlError::Transport {
                url: config.endpoint_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Fetch the exchanges document with bearer authentication.
    ///
    /// # Arguments
    /// * `api_token` - CoinCap API token, sent as `Authorization: Bearer`
    ///
    /// # Returns
    /// The parsed JSON document; 401/403 map to an authorization error and
    /// any other non-success status or non-JSON body to a data format error
    pub async fn fetch_exchanges(&self, api_token: &str) -> Result<Value, EtlError> {
        tracing::info!("Fetching exchange listings from {}", self.endpoint_url);

        let response = self
            .client
            .get(&self.endpoint_url)
            .bearer_auth(api_token)
            .send()
            .await
            .map_err(|source| self.transport_error(source))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!("Endpoint rejected credentials: HTTP {}", status.as_u16());
            return Err(EtlError::Authorization {
                url: self.endpoint_url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(source))?;

        if !status.is_success() {
            return Err(EtlError::DataFormat(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                self.endpoint_url,
                preview(&body)
            )));
        }

        let document: Value = serde_json::from_str(&body).map_err(|e| {
            EtlError::DataFormat(format!(
                "response from {} is not valid JSON: {} - body: {}",
                self.endpoint_url,
                e,
                preview(&body)
            ))
        })?;

        let snapshot_time = document
            .get("timestamp")
            .and_then(Value::as_i64)
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info!(
            "Received {} bytes (snapshot time {})",
            body.len(),
            snapshot_time
        );

        Ok(document)
    }

    fn transport_error(&self, source: reqwest::Error) -> EtlError {
        EtlError::Transport {
            url: self.endpoint_url.clone(),
            source,
        }
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
