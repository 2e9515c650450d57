//! HTTP error mapping for the nft-metadata server.
//!
//! Every failure leaves the router as a distinct status with a JSON body
//! `{"error": CODE, "message": text}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nftmeta_client::FetchError;
use nftmeta_core::StoreError;
use serde::Serialize;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Errors surfaced by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resolving the CID against the gateway failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading or writing the metadata table failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Fetch(FetchError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::EmptyIdentifier) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Fetch(FetchError::InvalidUrl(_)) | ApiError::Store(StoreError::EmptyIdentifier) => {
                "INVALID_IDENTIFIER"
            }
            ApiError::Fetch(FetchError::NetworkUnavailable(_)) => "UPSTREAM_UNAVAILABLE",
            ApiError::Fetch(FetchError::UpstreamStatus { .. }) => "UPSTREAM_STATUS",
            ApiError::Fetch(FetchError::MalformedDocument(_)) => "MALFORMED_DOCUMENT",
            ApiError::Store(StoreError::NotFound(_)) => "NOT_FOUND",
            ApiError::Store(_) => "STORE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code, status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(code, status = status.as_u16(), error = %self, "request rejected");
        }

        let body = ErrorBody { error: code, message: self.to_string() };
        (status, Json(body)).into_response()
    }
}
