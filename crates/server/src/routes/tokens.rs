//! `/tokens` routes: list cached documents and ingest a CID.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use nftmeta_core::Document;

use crate::error::ApiError;
use crate::handler::AppState;

/// Body returned by a successful ingest.
pub const INGEST_OK: &str = "success";

/// `GET /tokens`: every stored document, in store order.
pub async fn list_tokens(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.store.get_all().await?;
    tracing::debug!(count = documents.len(), backend = state.store.backend(), "listed tokens");
    Ok(Json(documents))
}

/// `GET /tokens/{cid}`: fetch the CID from the gateway and store it.
///
/// Nothing is written unless the fetch produced a document, and the success
/// body is only sent once the write has completed.
pub async fn ingest_token(
    State(state): State<Arc<AppState>>, Path(cid): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let document = state.fetcher.fetch(&cid).await?;
    let keys = document.len();

    state.store.put(&cid, document).await?;

    tracing::info!(cid = %cid, keys, backend = state.store.backend(), "stored token metadata");

    Ok(Json(INGEST_OK))
}
