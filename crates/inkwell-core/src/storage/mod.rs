//! Storage layer
//!
//! The Entry Store persists through a minimal key-value blob contract:
//! read the whole value for a key, or replace it. Three backends implement
//! it:
//!
//! - **File**: one JSON file per key in the data directory, atomic writes
//! - **SQLite**: a single `blobs` table in `inkwell.db`
//! - **Memory**: process-local, for tests and throwaway sessions

pub mod error;
pub mod file;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteBlobStore;

use crate::config::{Backend, Config};

/// Key-value blob persistence
pub trait BlobStore: Send {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn read_blob(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`
    fn write_blob(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Copy the raw value of `from` to `to` without decoding it.
    ///
    /// Works on blobs `read_blob` rejects. Copying a missing key is a no-op.
    fn copy_blob(&mut self, from: &str, to: &str) -> StorageResult<()>;

    /// Short name for log lines
    fn describe(&self) -> String;
}

/// Open the backend selected by the configuration
pub fn open_backend(config: &Config) -> StorageResult<Box<dyn BlobStore>> {
    match config.backend {
        Backend::File => Ok(Box::new(FileBlobStore::new(config.data_dir.clone()))),
        Backend::Sqlite => Ok(Box::new(SqliteBlobStore::open(&config.sqlite_path())?)),
        Backend::Memory => Ok(Box::new(MemoryBlobStore::new())),
    }
}

/// Check that a key is a plain name safe to use as a file stem
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
