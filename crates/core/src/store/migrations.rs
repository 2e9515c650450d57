//! Schema versioning for the SQLite backend.
//!
//! `_migrations` records one row per applied step. A step runs with its
//! bookkeeping row inside a single transaction, so a failed step leaves the
//! schema at the previous version.

use tokio_rusqlite::{Connection, params, rusqlite};

use crate::error::StoreError;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

/// Ordered by ascending version.
const STEPS: &[Migration] = &[Migration {
    version: 1,
    name: "token_metadata",
    sql: include_str!("../../migrations/001_token_metadata.sql"),
}];

fn schema_version(conn: &rusqlite::Connection) -> rusqlite::Result<i64> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;
    conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))
}

fn apply(conn: &mut rusqlite::Connection, step: &Migration) -> Result<(), StoreError> {
    let failed = |e: rusqlite::Error| StoreError::MigrationFailed(format!("{} ({}): {e}", step.version, step.name));

    let tx = conn.transaction().map_err(failed)?;
    tx.execute_batch(step.sql).map_err(failed)?;
    tx.execute(
        "INSERT INTO _migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![step.version, step.name, chrono::Utc::now().to_rfc3339()],
    )
    .map_err(failed)?;
    tx.commit().map_err(failed)
}

/// Bring the schema up to the latest version. Returns how many steps ran.
pub async fn run(conn: &Connection) -> Result<usize, StoreError> {
    let applied = conn
        .call(|conn| -> Result<usize, StoreError> {
            let current = schema_version(conn)?;
            let mut applied = 0;
            for step in STEPS.iter().filter(|step| step.version > current) {
                apply(conn, step)?;
                tracing::debug!(version = step.version, name = step.name, "applied migration");
                applied += 1;
            }
            Ok(applied)
        })
        .await?;

    Ok(applied)
}
