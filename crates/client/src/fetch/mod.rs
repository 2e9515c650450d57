//! Content fetcher for a content-addressable gateway.
//!
//! ### Resolution
//! - URL is the configured base URL with the CID appended verbatim.
//! - One GET per call; no retry, no streaming. The whole body is buffered.
//!
//! ### Failure modes
//! - Transport failure: `NetworkUnavailable`
//! - Non-2xx status: `UpstreamStatus`
//! - Body is not a JSON object: `MalformedDocument`
//!
//! A failed fetch never yields a placeholder document, so callers cannot
//! persist an empty record by accident.

pub mod error;
pub mod url;

use bytes::Bytes;
use reqwest::{Client, header};
use std::time::{Duration, Instant};

pub use error::FetchError;
pub use url::resolve;

use nftmeta_core::{AppConfig, Document};

/// Configuration for the content fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Gateway base URL (default: "https://ipfs.io/ipfs/")
    pub base_url: String,

    /// User agent string (default: "nft-metadata/0.1")
    pub user_agent: String,

    /// Request timeout (default: none)
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.nft_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.fetch_timeout(),
        }
    }
}

/// HTTP client that resolves CIDs into metadata documents.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    http: Client,
    config: FetchConfig,
}

impl ContentFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, config })
    }

    /// Fetch the document stored under `identifier`.
    pub async fn fetch(&self, identifier: &str) -> Result<Document, FetchError> {
        let start = Instant::now();
        let url = resolve(&self.config.base_url, identifier)?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "gateway returned non-success status");
            return Err(FetchError::UpstreamStatus { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let document = parse_document(&bytes)?;

        tracing::debug!(
            %url,
            fetch_ms = start.elapsed().as_millis() as u64,
            bytes = bytes.len(),
            keys = document.len(),
            "fetched metadata document"
        );

        Ok(document)
    }
}

/// Parse a response body as a JSON object.
pub fn parse_document(bytes: &Bytes) -> Result<Document, FetchError> {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(FetchError::MalformedDocument(format!("expected a JSON object, got {}", json_kind(&other)))),
        Err(e) => Err(FetchError::MalformedDocument(e.to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
