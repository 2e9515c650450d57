//! HTTP router for nft-metadata.
//!
//! This module defines the shared application state and the router that
//! maps the three public routes to their handlers.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::get,
};
use nftmeta_client::ContentFetcher;
use nftmeta_core::MetadataStore;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::routes::{get_db, ingest_token, list_tokens};

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "NFT Metadata";

/// State shared by every request. Both members manage their own pooling.
pub struct AppState {
    pub(crate) fetcher: ContentFetcher,
    pub(crate) store: Arc<dyn MetadataStore>,
}

impl AppState {
    pub fn new(fetcher: ContentFetcher, store: Arc<dyn MetadataStore>) -> Self {
        Self { fetcher, store }
    }
}

/// Build the router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tokens", get(list_tokens))
        .route("/tokens/{cid}", get(ingest_token))
        .route("/get-db/{ipfs_hash}", get(get_db))
        .layer(SetResponseHeaderLayer::overriding(header::SERVER, HeaderValue::from_static(SERVER_NAME)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, dead_gateway, sqlite_state, spawn_gateway, state_with};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_ingest_then_get_db() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, body) = send(&app, "/tokens/Qm123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("success"));

        let (status, body) = send(&app, "/get-db/Qm123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "name": "Token1" }));
    }

    #[tokio::test]
    async fn test_list_tokens_empty() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, body) = send(&app, "/tokens").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_tokens_after_ingest() {
        let app = router(sqlite_state(spawn_gateway().await).await);
        send(&app, "/tokens/Qm123").await;
        send(&app, "/tokens/Qm456").await;

        let (status, body) = send(&app, "/tokens").await;
        assert_eq!(status, StatusCode::OK);
        let documents = body.as_array().unwrap();
        assert_eq!(documents.len(), 2);
        assert!(documents.contains(&json!({ "name": "Token1" })));
        assert!(documents.iter().any(|d| d["name"] == "Token2"));
    }

    #[tokio::test]
    async fn test_reingest_overwrites() {
        let app = router(sqlite_state(spawn_gateway().await).await);
        send(&app, "/tokens/Qm123").await;
        send(&app, "/tokens/Qm123").await;

        let (_, body) = send(&app, "/tokens").await;
        assert_eq!(body, json!([{ "name": "Token1" }]));
    }

    #[tokio::test]
    async fn test_malformed_document_not_persisted() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, body) = send(&app, "/tokens/QmBroken").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "MALFORMED_DOCUMENT");

        let (status, _) = send(&app, "/get-db/QmBroken").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, "/tokens").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_upstream_status_is_bad_gateway() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, body) = send(&app, "/tokens/QmUnknown").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "UPSTREAM_STATUS");
    }

    #[tokio::test]
    async fn test_gateway_unreachable() {
        let app = router(sqlite_state(dead_gateway().await).await);

        let (status, body) = send(&app, "/tokens/Qm123").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "UPSTREAM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_get_db_missing() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, body) = send(&app, "/get-db/QmNeverWritten").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_store_failure_is_not_success() {
        let app = router(state_with(spawn_gateway().await, Arc::new(FailingStore)));

        let (status, body) = send(&app, "/tokens/Qm123").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "STORE_ERROR");

        let (status, _) = send(&app, "/tokens").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = send(&app, "/get-db/Qm123").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_server_header() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        for uri in ["/tokens", "/get-db/QmNeverWritten"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.headers()[header::SERVER], SERVER_NAME);
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = router(sqlite_state(spawn_gateway().await).await);

        let (status, _) = send(&app, "/tokens/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "/Tokens").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
