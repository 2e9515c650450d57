//! `/get-db/{ipfs_hash}` route: read one stored document.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use nftmeta_core::Document;

use crate::error::ApiError;
use crate::handler::AppState;

/// `GET /get-db/{ipfs_hash}`: the stored document, or 404.
pub async fn get_db(
    State(state): State<Arc<AppState>>, Path(ipfs_hash): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let document = state.store.get_one(&ipfs_hash).await?;
    Ok(Json(document))
}
