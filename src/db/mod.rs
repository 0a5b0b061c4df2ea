//! Read-only access to the Day One SQLite store.
//!
//! Every public operation opens its own [`Database`], runs its queries and
//! drops the handle before returning. There is no pooling and no shared state
//! between calls; the store is never written to.
//!
//! # Module Structure
//!
//! - `schema`: Versioned table/column mapping
//! - `entries`: Entry rows, tags and counts
//! - `journals`: Journal aggregation
//!
//! # Example
//!
//! ```no_run
//! use dayone_tools::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/DayOne.sqlite"))?;
//! let total = dayone_tools::db::entries::count_entries(&db, None)?;
//! println!("{} entries", total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod journals;
pub mod schema;

use crate::errors::{AppError, AppResult};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use schema::SchemaMapping;
use std::path::Path;
use tracing::debug;

/// A read-only connection to the Day One store together with the schema
/// mapping resolved for it.
pub struct Database {
    conn: Connection,
    mapping: SchemaMapping,
}

impl Database {
    /// Opens the store at `db_path` read-only.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StorageUnavailable` if the file does not exist (the
    /// app has never been run), the connection cannot be established, or the
    /// file is not a SQLite database.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening Day One database at: {:?}", db_path);

        if !db_path.exists() {
            return Err(AppError::StorageUnavailable(format!(
                "Day One database not found at {}. Make sure Day One is installed and has been run at least once.",
                db_path.display()
            )));
        }

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AppError::StorageUnavailable(format!(
                "Failed to connect to Day One database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| {
            AppError::StorageUnavailable(format!(
                "Failed to read Day One database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        let mapping = SchemaMapping::day_one_2().resolve_tag_join(&conn);
        Ok(Database { conn, mapping })
    }

    /// The underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The schema mapping in use for this store.
    pub fn mapping(&self) -> &SchemaMapping {
        &self.mapping
    }
}

/// Reads a text-like column that may be stored as TEXT or BLOB.
pub(crate) fn text_column(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
    }
}

/// Whether an opaque column holds anything worth reporting.
pub(crate) fn column_present(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Null => false,
        ValueRef::Integer(i) => i != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => !bytes.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("DayOne.sqlite");

        match Database::open(&db_path) {
            Err(AppError::StorageUnavailable(msg)) => {
                assert!(msg.contains("has been run at least once"))
            }
            _ => panic!("Expected StorageUnavailable"),
        }
    }

    #[test]
    fn test_non_sqlite_file_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("DayOne.sqlite");
        std::fs::write(&db_path, "not a database, just notes\n".repeat(200)).unwrap();

        match Database::open(&db_path) {
            Err(AppError::StorageUnavailable(msg)) => {
                assert!(msg.contains("Failed to read Day One database"))
            }
            Err(other) => panic!("Expected StorageUnavailable, got {:?}", other),
            Ok(_) => panic!("Expected StorageUnavailable, got an open database"),
        }
    }

    #[test]
    fn test_open_is_read_only() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("DayOne.sqlite");
        Connection::open(&db_path)
            .unwrap()
            .execute_batch("CREATE TABLE ZENTRY (Z_PK INTEGER PRIMARY KEY);")
            .unwrap();

        let db = Database::open(&db_path).unwrap();
        let result = db.conn().execute("INSERT INTO ZENTRY (Z_PK) VALUES (1)", []);
        assert!(result.is_err(), "Writes must be rejected on a read-only handle");
    }

    #[test]
    fn test_column_helpers() {
        assert_eq!(text_column(ValueRef::Null), None);
        assert_eq!(
            text_column(ValueRef::Text(b"Europe/Lisbon")),
            Some("Europe/Lisbon".to_string())
        );
        assert_eq!(text_column(ValueRef::Blob(b"UTC")), Some("UTC".to_string()));

        assert!(!column_present(ValueRef::Null));
        assert!(!column_present(ValueRef::Integer(0)));
        assert!(column_present(ValueRef::Integer(42)));
        assert!(!column_present(ValueRef::Blob(b"")));
        assert!(column_present(ValueRef::Blob(b"\x01")));
    }
}
