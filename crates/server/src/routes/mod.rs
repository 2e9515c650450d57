//! HTTP route handlers.
//!
//! Handlers are thin: they call the fetcher and the store and let
//! [`ApiError`](crate::error::ApiError) decide the status on failure.

pub mod get_db;
pub mod tokens;

pub use get_db::get_db;
pub use tokens::{ingest_token, list_tokens};
