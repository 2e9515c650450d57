//! Metadata store: one record per content identifier.
//!
//! This module defines the [`MetadataStore`] contract used by the router and
//! two backends for it:
//!
//! - [`DynamoStore`]: managed DynamoDB table, keyed by `ipfs_hash`
//! - [`SqliteStore`]: local SQLite file via tokio-rusqlite, for development
//!   and tests
//!
//! Every write is a full overwrite; there is no conditional write or
//! versioning. Reads return the document portion of a record only.

pub mod attribute;
pub mod dynamo;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::error::StoreError;
pub use dynamo::DynamoStore;
pub use sqlite::SqliteStore;

use crate::config::{AppConfig, StoreBackend};

/// An open-ended JSON object describing a token.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Attribute holding the content identifier.
pub const IDENTIFIER_ATTR: &str = "ipfs_hash";

/// Attribute holding the document.
pub const DOCUMENT_ATTR: &str = "metadata";

/// A document together with the identifier it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub ipfs_hash: String,
    pub metadata: Document,
}

impl MetadataRecord {
    /// Build a record, rejecting an empty identifier.
    pub fn new(ipfs_hash: impl Into<String>, metadata: Document) -> Result<Self, StoreError> {
        let ipfs_hash = ipfs_hash.into();
        if ipfs_hash.is_empty() {
            return Err(StoreError::EmptyIdentifier);
        }
        Ok(Self { ipfs_hash, metadata })
    }
}

/// Persistent table of metadata records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Write a record, replacing any existing record with the same identifier.
    async fn put(&self, identifier: &str, document: Document) -> Result<(), StoreError>;

    /// Read the document stored under `identifier`.
    ///
    /// Returns `StoreError::NotFound` when no record exists.
    async fn get_one(&self, identifier: &str) -> Result<Document, StoreError>;

    /// Read every stored document. Order is unspecified.
    async fn get_all(&self) -> Result<Vec<Document>, StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Open the store selected by `config.store_backend`.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn MetadataStore>, StoreError> {
    let store: Arc<dyn MetadataStore> = match config.store_backend {
        StoreBackend::Dynamodb => Arc::new(DynamoStore::from_config(config).await),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.db_path).await?),
    };

    tracing::info!(backend = store.backend(), table = %config.table_name, "metadata store ready");

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_rejects_empty_identifier() {
        let result = MetadataRecord::new("", Document::new());
        assert!(matches!(result, Err(StoreError::EmptyIdentifier)));
    }

    #[test]
    fn test_record_serializes_with_table_attribute_names() {
        let mut metadata = Document::new();
        metadata.insert("name".into(), json!("Token1"));
        let record = MetadataRecord::new("Qm123", metadata).unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "ipfs_hash": "Qm123", "metadata": { "name": "Token1" } }));
    }

    #[tokio::test]
    async fn test_open_store_sqlite_backend() {
        let dir = std::env::temp_dir().join(format!("nftmeta-open-store-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = AppConfig {
            store_backend: StoreBackend::Sqlite,
            db_path: dir.join("store.sqlite"),
            ..Default::default()
        };

        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), "sqlite");
        assert!(store.get_all().await.unwrap().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
