//! In-memory blob store
//!
//! Clones share the same underlying map, so a test can keep a handle after
//! handing the store to an `EntryStore` and inspect or tamper with what was
//! written. Writes can be switched to fail to exercise the unsaved-changes
//! path.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::error::{StorageError, StorageResult};
use super::{validate_key, BlobStore};

#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a blob, as if an earlier process had written it
    pub fn with_blob(self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.lock_blobs().insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock_blobs().get(key).cloned()
    }

    /// Make every subsequent write fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self, key: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteError {
                path: PathBuf::from(format!("memory://{}", key)),
                source: io::Error::new(io::ErrorKind::Other, "writes are disabled"),
            });
        }
        Ok(())
    }

    fn lock_blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BlobStore for MemoryBlobStore {
    fn read_blob(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        Ok(self.get(key))
    }

    fn write_blob(&mut self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.check_writable(key)?;
        self.insert(key, value);
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn copy_blob(&mut self, from: &str, to: &str) -> StorageResult<()> {
        validate_key(from)?;
        validate_key(to)?;
        self.check_writable(to)?;
        if let Some(value) = self.get(from) {
            self.insert(to, &value);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
