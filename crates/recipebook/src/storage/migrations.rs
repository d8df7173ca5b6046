//! Schema versioning for the `SQLite` backend.
//!
//! Each entry of `MIGRATIONS` moves the schema up one version and runs in
//! its own transaction together with the version bump. The reached version
//! lives in the `metadata` table, which exists before anything else, so a
//! fresh file reads as version 0.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Schema steps in order; entry `n` brings the schema to version `n + 1`.
const MIGRATIONS: &[&str] = &[
    // 1: one row per slot
    r"
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value BLOB NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
];

/// The schema version this build writes.
pub const CURRENT_VERSION: usize = MIGRATIONS.len();

const VERSION_KEY: &str = "schema_version";

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if a migration fails, or if the database was written by a
/// newer build.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let version = schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version \
                 {CURRENT_VERSION}"
            ),
        });
    }

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(version) {
        let target = index + 1;
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(|e| Error::DatabaseMigration {
            message: format!("step to version {target} failed: {e}"),
        })?;
        set_schema_version(&tx, target)?;
        tx.commit()?;
        debug!("Schema migrated to version {}", target);
    }

    Ok(())
}

/// Read the stored schema version; 0 when none is recorded.
///
/// # Errors
///
/// Returns an error if the stored value is not a number.
pub fn schema_version(conn: &Connection) -> Result<usize> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: usize) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}
