//! Shared fixtures for router tests.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{Router, extract::Path, http::StatusCode, routing::get};
use nftmeta_client::{ContentFetcher, FetchConfig};
use nftmeta_core::store::SqliteStore;
use nftmeta_core::{Document, MetadataStore, StoreError};

use crate::handler::AppState;

async fn gateway(Path(cid): Path<String>) -> (StatusCode, String) {
    match cid.as_str() {
        "Qm123" => (StatusCode::OK, r#"{"name":"Token1"}"#.to_string()),
        "Qm456" => (
            StatusCode::OK,
            r#"{"name":"Token2","attributes":[{"trait_type":"Eyes","value":"Laser"}]}"#.to_string(),
        ),
        "QmBroken" => (StatusCode::OK, "this is not json".to_string()),
        _ => (StatusCode::NOT_FOUND, "ipfs resolve: no link named".to_string()),
    }
}

/// Start a loopback gateway and return its base URL.
pub async fn spawn_gateway() -> String {
    let app = Router::new().route("/ipfs/{cid}", get(gateway));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/ipfs/")
}

/// A base URL nothing is listening on.
pub async fn dead_gateway() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/ipfs/")
}

/// Store whose every operation fails at the transport level.
pub struct FailingStore;

#[async_trait]
impl MetadataStore for FailingStore {
    async fn put(&self, _identifier: &str, _document: Document) -> Result<(), StoreError> {
        Err(StoreError::TransportFault("PutItem: AccessDeniedException".into()))
    }

    async fn get_one(&self, _identifier: &str) -> Result<Document, StoreError> {
        Err(StoreError::TransportFault("GetItem: AccessDeniedException".into()))
    }

    async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::TransportFault("Scan: AccessDeniedException".into()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// App state over an in-memory SQLite store and the given gateway.
pub async fn sqlite_state(base_url: String) -> Arc<AppState> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    state_with(base_url, Arc::new(store))
}

/// App state over an arbitrary store and the given gateway.
pub fn state_with(base_url: String, store: Arc<dyn MetadataStore>) -> Arc<AppState> {
    let fetcher = ContentFetcher::new(FetchConfig { base_url, ..Default::default() }).unwrap();
    Arc::new(AppState::new(fetcher, store))
}
