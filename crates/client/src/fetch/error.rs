//! Content fetcher error types.

use std::sync::Arc;

/// Errors from resolving a CID against the gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Base URL and identifier do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The gateway could not be reached or the transfer did not complete.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(Arc<reqwest::Error>),

    /// The gateway answered with a non-success status.
    #[error("gateway returned status {status}")]
    UpstreamStatus { status: u16 },

    /// The response body is not a JSON object.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::NetworkUnavailable(Arc::new(err))
    }
}
