//! Core types and shared functionality for nft-metadata.
//!
//! This crate provides:
//! - Metadata store contract with DynamoDB and SQLite backends
//! - Store error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use error::StoreError;
pub use store::{Document, MetadataRecord, MetadataStore, open_store};
