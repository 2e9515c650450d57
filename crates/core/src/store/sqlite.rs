//! SQLite-backed metadata store.
//!
//! Opens the database with WAL pragmas, runs migrations, and keeps each
//! document as JSON text in `token_metadata.metadata`.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, params, rusqlite};

use super::migrations;
use super::{Document, MetadataRecord, MetadataStore};
use crate::error::StoreError;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Metadata store handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).await.map_err(|e| StoreError::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(StoreError::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

fn decode_document(identifier: &str, json: &str) -> Result<Document, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::MalformedRecord(format!("{identifier}: {e}")))
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn put(&self, identifier: &str, document: Document) -> Result<(), StoreError> {
        let record = MetadataRecord::new(identifier, document)?;
        let json = serde_json::to_string(&record.metadata)
            .map_err(|e| StoreError::MalformedRecord(format!("{}: {e}", record.ipfs_hash)))?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), StoreError> {
                conn.execute(
                    "INSERT INTO token_metadata (ipfs_hash, metadata, updated_at)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(ipfs_hash) DO UPDATE SET
                         metadata = excluded.metadata,
                         updated_at = excluded.updated_at",
                    params![record.ipfs_hash, json, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(StoreError::from)
    }

    async fn get_one(&self, identifier: &str) -> Result<Document, StoreError> {
        let identifier = identifier.to_string();
        self.conn
            .call(move |conn| -> Result<Document, StoreError> {
                let result = conn.query_row(
                    "SELECT metadata FROM token_metadata WHERE ipfs_hash = ?1",
                    params![identifier],
                    |row| row.get::<_, String>(0),
                );

                match result {
                    Ok(json) => decode_document(&identifier, &json),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(identifier)),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(StoreError::from)
    }

    async fn get_all(&self) -> Result<Vec<Document>, StoreError> {
        self.conn
            .call(|conn| -> Result<Vec<Document>, StoreError> {
                let mut stmt = conn.prepare("SELECT ipfs_hash, metadata FROM token_metadata")?;
                let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

                let mut documents = Vec::new();
                for row in rows {
                    let (identifier, json) = row?;
                    documents.push(decode_document(&identifier, &json)?);
                }
                Ok(documents)
            })
            .await
            .map_err(StoreError::from)
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
