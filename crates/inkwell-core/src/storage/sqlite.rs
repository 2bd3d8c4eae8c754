//! SQLite-backed blob store
//!
//! Keeps every blob as one row of the `blobs` table. Useful when the data
//! directory lives somewhere that handles many small file renames poorly.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::error::{StorageError, StorageResult};
use super::schema::{init_schema, needs_init};
use super::{validate_key, BlobStore};

pub struct SqliteBlobStore {
    conn: Connection,
    label: String,
}

impl SqliteBlobStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self {
            conn,
            label: format!("sqlite:{}", path.display()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            label: "sqlite::memory:".to_string(),
        })
    }
}

impl BlobStore for SqliteBlobStore {
    fn read_blob(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_blob(&mut self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key = %key, bytes = value.len(), "wrote blob row");
        Ok(())
    }

    fn copy_blob(&mut self, from: &str, to: &str) -> StorageResult<()> {
        validate_key(from)?;
        validate_key(to)?;
        let copied = self.conn.execute(
            "INSERT INTO blobs (key, value, updated_at)
             SELECT ?2, value, ?3 FROM blobs WHERE key = ?1
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![from, to, Utc::now().to_rfc3339()],
        )?;
        debug!(from = %from, to = %to, rows = copied, "copied blob row");
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_key() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        assert!(store.read_blob("blog-posts").unwrap().is_none());
    }

    #[test]
    fn test_write_replaces_value() {
        let mut store = SqliteBlobStore::open_in_memory().unwrap();
        store.write_blob("blog-posts", "first").unwrap();
        store.write_blob("blog-posts", "second").unwrap();

        assert_eq!(
            store.read_blob("blog-posts").unwrap().as_deref(),
            Some("second")
        );
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM blobs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("inkwell.db");

        {
            let mut store = SqliteBlobStore::open(&path).unwrap();
            store.write_blob("blog-posts", "[]").unwrap();
        }

        let store = SqliteBlobStore::open(&path).unwrap();
        assert_eq!(store.read_blob("blog-posts").unwrap().as_deref(), Some("[]"));
        assert!(store.describe().starts_with("sqlite:"));
    }
}
