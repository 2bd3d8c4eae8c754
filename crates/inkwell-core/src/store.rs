//! Entry Store
//!
//! The `EntryStore` holds the authoritative in-memory collection and is the
//! only writer of persisted state. Every mutation rewrites the whole
//! collection through the configured `BlobStore`.
//!
//! ## Stored format
//!
//! A single blob under [`STORAGE_KEY`]:
//!
//! ```text
//! {"version": 1, "entries": [ { "id": "...", "title": "...", ... } ]}
//! ```
//!
//! Blobs written by the browser version of the journal are a bare JSON array
//! of entries; those are still read and get upgraded on the next write.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = EntryStore::open(&config)?;  // Seeds sample entries on first run
//!
//! store.upsert(entry)?;
//! store.delete(&id)?;
//! ```

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Entry, EntryId, EntryStatus};
use crate::query::{build_tag_index, TagIndex};
use crate::storage::{open_backend, BlobStore};

/// Name of the blob holding the entry collection
pub const STORAGE_KEY: &str = "blog-posts";

/// Version written into the stored envelope
pub const FORMAT_VERSION: u32 = 1;

/// Where an unusable collection is copied before anything is written
pub const CORRUPT_KEY: &str = "blog-posts.corrupt";

/// Entries loaded when nothing has ever been stored
const SEED_ENTRIES: &str = r#"[
  {
    "id": "1",
    "title": "Reflections on Remote Work",
    "content": "Working from home has fundamentally changed how I think about productivity and work-life balance. The flexibility is incredible, but it requires discipline and clear boundaries between work and personal life.",
    "status": "published",
    "createdAt": "2025-01-05T10:30:00",
    "updatedAt": "2025-01-05T14:20:00",
    "tags": ["work", "productivity", "remote"]
  },
  {
    "id": "2",
    "title": "Learning to Cook Italian Food",
    "content": "Yesterday I attempted to make fresh pasta from scratch. The process was meditative, almost therapeutic. Mixing the flour with eggs, kneading the dough until it became silky smooth - there's something deeply satisfying about creating something delicious with your own hands.",
    "status": "published",
    "createdAt": "2025-01-04T16:45:00",
    "updatedAt": "2025-01-04T17:30:00",
    "tags": ["cooking", "italy", "learning"]
  },
  {
    "id": "3",
    "title": "Morning Thoughts on Creativity",
    "content": "Creativity isn't about waiting for inspiration to strike. It's about showing up consistently and creating the conditions for ideas to emerge. The best creative work happens when we establish routines and remove friction from the creative process.",
    "status": "published",
    "createdAt": "2025-01-03T08:15:00",
    "updatedAt": "2025-01-03T08:45:00",
    "tags": ["creativity", "writing", "morning"]
  }
]"#;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    entries: &'a [Entry],
}

#[derive(Deserialize)]
struct StoredEnvelope {
    entries: Vec<Entry>,
}

/// Counts shown above the dashboard list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
}

/// Why writes to the main blob are held back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteGuard {
    /// The unusable blob has not been copied aside yet
    Unpreserved,
    /// The blob comes from a newer build and must not be downgraded
    NewerFormat(u64),
}

/// In-memory entry collection backed by a blob store
pub struct EntryStore {
    entries: Vec<Entry>,
    backend: Box<dyn BlobStore>,
    write_retries: u32,
    /// A mutation has not reached the backend yet
    dirty: bool,
    /// Why the persisted collection could not be used at load time
    load_warning: Option<StoreError>,
    guard: Option<WriteGuard>,
}

impl EntryStore {
    /// Open the backend selected by `config` and load the collection
    pub fn open(config: &Config) -> Result<Self> {
        let backend = open_backend(config)
            .with_context(|| format!("Failed to open {} storage", config.backend))?;
        Ok(Self::load(backend).with_write_retries(config.write_retries))
    }

    /// Read the collection from `backend`.
    ///
    /// Never fails. When nothing is stored yet the sample entries are used
    /// and written back.
    ///
    /// When the stored blob cannot be read or parsed, the problem is logged
    /// and kept in [`load_warning`](Self::load_warning), the raw blob is
    /// copied to [`CORRUPT_KEY`], and the sample entries are loaded in memory
    /// only. The main blob is not written until that copy exists. A blob from
    /// a newer format version is never overwritten.
    pub fn load(backend: Box<dyn BlobStore>) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            backend,
            write_retries: 0,
            dirty: false,
            load_warning: None,
            guard: None,
        };

        match store.read_persisted() {
            Ok(Some(entries)) => {
                debug!(
                    count = entries.len(),
                    backend = %store.backend.describe(),
                    "loaded entries"
                );
                store.entries = entries;
            }
            Ok(None) => {
                info!(backend = %store.backend.describe(), "no stored entries, seeding samples");
                store.seed();
            }
            Err(e) => {
                warn!(error = %e, "stored entries unusable, falling back to samples");
                store.entries = seed_entries();
                store.guard = match &e {
                    StoreError::UnsupportedVersion { found, .. } => {
                        Some(WriteGuard::NewerFormat(*found))
                    }
                    _ => Some(WriteGuard::Unpreserved),
                };
                store.preserve_unusable();
                store.load_warning = Some(e);
            }
        }

        store
    }

    /// Number of extra attempts after a failed write
    pub fn with_write_retries(mut self, retries: u32) -> Self {
        self.write_retries = retries;
        self
    }

    fn read_persisted(&self) -> Result<Option<Vec<Entry>>, StoreError> {
        let raw = self
            .backend
            .read_blob(STORAGE_KEY)
            .map_err(|source| StoreError::Read {
                key: STORAGE_KEY.to_string(),
                source,
            })?;

        raw.map(|raw| decode(&raw)).transpose()
    }

    /// Copy the unusable blob aside, lifting the guard once it is safe
    fn preserve_unusable(&mut self) {
        match self.backend.copy_blob(STORAGE_KEY, CORRUPT_KEY) {
            Ok(()) => {
                warn!(key = CORRUPT_KEY, "preserved unusable entries");
                if self.guard == Some(WriteGuard::Unpreserved) {
                    self.guard = None;
                }
            }
            Err(e) => {
                error!(error = %e, key = CORRUPT_KEY, "failed to preserve unusable entries")
            }
        }
    }

    /// Refuse a write that would destroy data this build could not load
    fn check_guard(&mut self) -> Result<(), StoreError> {
        if self.guard == Some(WriteGuard::Unpreserved) {
            self.preserve_unusable();
        }
        let reason = match self.guard {
            None => return Ok(()),
            Some(WriteGuard::Unpreserved) => {
                format!("the unusable data could not be copied to '{}'", CORRUPT_KEY)
            }
            Some(WriteGuard::NewerFormat(found)) => format!(
                "it uses format version {}, newer than {}",
                found, FORMAT_VERSION
            ),
        };
        Err(StoreError::Protected {
            key: STORAGE_KEY.to_string(),
            reason,
        })
    }

    fn seed(&mut self) {
        self.entries = seed_entries();
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to persist sample entries");
        }
    }

    // ==================== Queries ====================

    /// Current collection; order carries no meaning
    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tag usage across every entry, drafts included
    pub fn tag_index(&self) -> TagIndex {
        build_tag_index(&self.entries)
    }

    /// Every tag in use, alphabetical
    pub fn available_tags(&self) -> Vec<String> {
        self.tag_index()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        let published = self
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Published)
            .count();
        StoreStats {
            total: self.entries.len(),
            published,
            drafts: self.entries.len() - published,
        }
    }

    /// Problem found with the stored data at load time, if any
    pub fn load_warning(&self) -> Option<&StoreError> {
        self.load_warning.as_ref()
    }

    /// True when the last mutation could not be written
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True when changes are held in memory to protect the stored blob
    pub fn is_protected(&self) -> bool {
        self.guard.is_some()
    }

    // ==================== Mutations ====================

    /// Insert `entry`, or replace the stored entry with the same id.
    ///
    /// Derived fields are recomputed before storing. On a write failure the
    /// in-memory collection keeps the change and the store stays dirty until
    /// a later write or [`flush`](Self::flush) succeeds.
    pub fn upsert(&mut self, mut entry: Entry) -> Result<Entry, StoreError> {
        entry.normalize();

        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => self.entries.push(entry.clone()),
        }

        self.persist()?;
        Ok(entry)
    }

    /// Remove the entry with `id`. Absent ids are not an error.
    pub fn delete(&mut self, id: &EntryId) -> Result<(), StoreError> {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        if self.entries.len() == before {
            debug!(%id, "delete of absent entry");
        }
        self.persist()
    }

    /// Retry a write that previously failed.
    ///
    /// A store loaded from an unusable blob first retries copying it aside.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.persist()
        } else {
            Ok(())
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if let Err(e) = self.check_guard() {
            self.dirty = true;
            warn!(error = %e, "keeping changes in memory");
            return Err(e);
        }

        let encoded = serde_json::to_string(&Envelope {
            version: FORMAT_VERSION,
            entries: &self.entries,
        })?;

        let attempts = self.write_retries + 1;
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.backend.write_blob(STORAGE_KEY, &encoded) {
                Ok(()) => {
                    self.dirty = false;
                    debug!(count = self.entries.len(), attempt, "persisted entries");
                    return Ok(());
                }
                Err(e) => {
                    warn!(error = %e, attempt, attempts, "failed to persist entries");
                    last_error = Some(e);
                }
            }
        }

        self.dirty = true;
        match last_error {
            Some(source) => Err(StoreError::Write { attempts, source }),
            None => Ok(()),
        }
    }
}

/// Parse a stored blob, either the versioned envelope or a legacy bare array.
///
/// Entries are normalized and duplicate ids dropped (first one wins).
fn decode(raw: &str) -> Result<Vec<Entry>, StoreError> {
    let malformed = |details: String| StoreError::Malformed {
        key: STORAGE_KEY.to_string(),
        details,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

    let entries: Vec<Entry> = match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?,
        Value::Object(ref map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| malformed("missing numeric 'version' field".to_string()))?;
            if version > u64::from(FORMAT_VERSION) {
                return Err(StoreError::UnsupportedVersion {
                    key: STORAGE_KEY.to_string(),
                    found: version,
                    supported: FORMAT_VERSION,
                });
            }
            let envelope: StoredEnvelope =
                serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
            envelope.entries
        }
        other => {
            return Err(malformed(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut unique = Vec::with_capacity(entries.len());
    for mut entry in entries {
        if !seen.insert(entry.id.clone()) {
            warn!(id = %entry.id, "dropping entry with duplicate id");
            continue;
        }
        entry.normalize();
        unique.push(entry);
    }
    Ok(unique)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The sample entries a fresh installation starts with
pub fn seed_entries() -> Vec<Entry> {
    decode(SEED_ENTRIES).unwrap_or_else(|e| {
        error!(error = %e, "built-in sample entries failed to parse");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileBlobStore, MemoryBlobStore};
    use tempfile::TempDir;

    fn draft(id: &str, title: &str) -> Entry {
        let mut entry = Entry::new_draft();
        entry.id = EntryId::from(id);
        entry.title = title.to_string();
        entry
    }

    fn empty_store() -> (EntryStore, MemoryBlobStore) {
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, "[]");
        (EntryStore::load(Box::new(handle.clone())), handle)
    }

    #[test]
    fn test_seeds_once_when_nothing_stored() {
        let handle = MemoryBlobStore::new();
        let store = EntryStore::load(Box::new(handle.clone()));

        assert_eq!(store.len(), 3);
        assert!(store.list().iter().all(|e| e.is_published() && e.is_public));
        assert!(store
            .list()
            .iter()
            .all(|e| e.published_date == Some(e.updated_at)));
        assert!(store.load_warning().is_none());

        // Seeds were written back, so the next load reads them instead
        let stored = handle.get(STORAGE_KEY).unwrap();
        assert!(stored.contains("\"version\":1"));
    }

    #[test]
    fn test_seed_word_counts_match_content() {
        for entry in seed_entries() {
            assert_eq!(entry.word_count, crate::text::word_count(&entry.content));
            assert!(entry.word_count > 0);
        }
    }

    #[test]
    fn test_explicitly_emptied_store_is_not_reseeded() {
        let handle = MemoryBlobStore::new();
        let mut store = EntryStore::load(Box::new(handle.clone()));
        let ids: Vec<EntryId> = store.list().iter().map(|e| e.id.clone()).collect();
        for id in &ids {
            store.delete(id).unwrap();
        }
        assert!(store.is_empty());

        let reloaded = EntryStore::load(Box::new(handle));
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_upsert_appends_then_replaces() {
        let (mut store, _) = empty_store();

        store.upsert(draft("a", "First")).unwrap();
        store.upsert(draft("b", "Second")).unwrap();
        assert_eq!(store.len(), 2);

        store.upsert(draft("a", "First, revised")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(&EntryId::from("a")).unwrap().title,
            "First, revised"
        );
    }

    #[test]
    fn test_upsert_normalizes() {
        let (mut store, _) = empty_store();

        let mut entry = draft("a", "Tagged");
        entry.content = "<p>three little words</p>".to_string();
        entry.tags = vec!["x".into(), "x".into()];
        entry.is_public = true;

        let stored = store.upsert(entry).unwrap();
        assert_eq!(stored.tags, vec!["x"]);
        assert_eq!(stored.word_count, 3);
        assert!(!stored.is_public);
        assert_eq!(store.get(&stored.id), Some(&stored));
    }

    #[test]
    fn test_every_mutation_writes_full_collection() {
        let (mut store, handle) = empty_store();
        let writes_before = handle.write_count();

        store.upsert(draft("a", "A")).unwrap();
        store.upsert(draft("b", "B")).unwrap();
        store.delete(&EntryId::from("a")).unwrap();

        assert_eq!(handle.write_count(), writes_before + 3);
        let persisted = decode(&handle.get(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, EntryId::from("b"));
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (mut store, _) = empty_store();
        store.upsert(draft("a", "A")).unwrap();
        let before = store.list().to_vec();

        store.delete(&EntryId::from("missing")).unwrap();

        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_malformed_blob_falls_back_to_seed_and_is_preserved() {
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, "{not json");
        let store = EntryStore::load(Box::new(handle.clone()));

        assert_eq!(store.len(), 3);
        assert!(matches!(
            store.load_warning(),
            Some(StoreError::Malformed { .. })
        ));
        assert!(store.load_warning().unwrap().recovery_suggestion().is_some());
        assert_eq!(
            handle.get("blog-posts.corrupt").as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_malformed_blob_is_not_overwritten_by_samples() {
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, "{not json");
        let writes_before = handle.write_count();
        let mut store = EntryStore::load(Box::new(handle.clone()));

        assert_eq!(handle.get(STORAGE_KEY).as_deref(), Some("{not json"));
        assert_eq!(handle.write_count(), writes_before);
        assert!(!store.is_protected());

        // Once the blob is copied aside, edits may replace it
        store.upsert(draft("a", "Fresh start")).unwrap();
        assert!(handle.get(STORAGE_KEY).unwrap().contains("Fresh start"));
        assert_eq!(handle.get(CORRUPT_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_unreadable_file_is_left_in_place_and_copied() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blog-posts.json");
        let mut raw = br#"{"version":1,"entries":[{"id":"mine","title":"caf"#.to_vec();
        raw.push(0xFF);
        raw.extend_from_slice(br#"","content":"","status":"draft","#);
        raw.extend_from_slice(br#""createdAt":"2025-01-01T00:00:00Z","#);
        raw.extend_from_slice(br#""updatedAt":"2025-01-01T00:00:00Z"}]}"#);
        std::fs::write(&path, &raw).unwrap();

        let store = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));

        assert!(matches!(store.load_warning(), Some(StoreError::Read { .. })));
        assert_eq!(store.len(), 3);
        assert_eq!(std::fs::read(&path).unwrap(), raw);
        assert_eq!(
            std::fs::read(temp_dir.path().join("blog-posts.corrupt.json")).unwrap(),
            raw
        );
    }

    #[test]
    fn test_writes_held_back_until_unusable_blob_is_copied() {
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, "{not json");
        handle.set_fail_writes(true);
        let mut store = EntryStore::load(Box::new(handle.clone()));
        assert!(store.is_protected());
        assert!(handle.get(CORRUPT_KEY).is_none());

        let err = store.upsert(draft("a", "Kept in memory")).unwrap_err();
        assert!(matches!(err, StoreError::Protected { .. }));
        assert!(store.is_dirty());
        assert_eq!(handle.get(STORAGE_KEY).as_deref(), Some("{not json"));

        handle.set_fail_writes(false);
        store.flush().unwrap();
        assert!(!store.is_protected());
        assert_eq!(handle.get(CORRUPT_KEY).as_deref(), Some("{not json"));
        assert!(handle.get(STORAGE_KEY).unwrap().contains("Kept in memory"));
    }

    #[test]
    fn test_newer_format_version_is_rejected_and_never_overwritten() {
        let blob = r#"{"version":2,"entries":[],"extra":"future data"}"#;
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, blob);
        let mut store = EntryStore::load(Box::new(handle.clone()));

        assert!(matches!(
            store.load_warning(),
            Some(StoreError::UnsupportedVersion { found: 2, .. })
        ));
        assert_eq!(handle.get(STORAGE_KEY).as_deref(), Some(blob));
        assert!(store.is_protected());

        let err = store.upsert(draft("a", "Local only")).unwrap_err();
        assert!(matches!(err, StoreError::Protected { .. }));
        assert!(store.is_dirty());
        assert!(store.contains(&EntryId::from("a")));
        assert!(store.flush().is_err());
        assert_eq!(handle.get(STORAGE_KEY).as_deref(), Some(blob));
    }

    #[test]
    fn test_blank_tags_in_blob_are_dropped() {
        let blob = r#"{"version":1,"entries":[
            {"id":"a","title":"t","content":"","status":"draft","tags":["", "  ", " work ", "work"],
             "createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"}
        ]}"#;
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, blob);
        let store = EntryStore::load(Box::new(handle));

        assert_eq!(store.list()[0].tags, vec!["work"]);
        assert!(crate::query::filter_by_tag_name(store.list(), "").is_empty());
        assert_eq!(store.available_tags(), vec!["work"]);
    }

    #[test]
    fn test_reads_legacy_array_and_upgrades_on_write() {
        let legacy = r#"[{
            "id": "1736000000000abc",
            "title": "Old post",
            "content": "<p>kept as is</p>",
            "status": "published",
            "isPublic": true,
            "createdAt": "2025-01-05T10:30:00",
            "updatedAt": "2025-01-05T14:20:00",
            "tags": ["work", "work"],
            "wordCount": 850
        }]"#;
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, legacy);
        let mut store = EntryStore::load(Box::new(handle.clone()));

        assert!(store.load_warning().is_none());
        let entry = &store.list()[0];
        assert_eq!(entry.tags, vec!["work"]);
        assert_eq!(entry.word_count, 3);
        assert_eq!(entry.published_date, Some(entry.updated_at));

        store.flush().unwrap();
        store.upsert(draft("new", "New")).unwrap();
        assert!(handle.get(STORAGE_KEY).unwrap().starts_with("{\"version\":1"));
    }

    #[test]
    fn test_duplicate_ids_in_blob_are_dropped() {
        let blob = r#"{"version":1,"entries":[
            {"id":"a","title":"first","content":"","status":"draft","createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"},
            {"id":"a","title":"second","content":"","status":"draft","createdAt":"2025-01-01T00:00:00Z","updatedAt":"2025-01-01T00:00:00Z"}
        ]}"#;
        let handle = MemoryBlobStore::new().with_blob(STORAGE_KEY, blob);
        let store = EntryStore::load(Box::new(handle));

        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "first");
    }

    #[test]
    fn test_write_failure_keeps_change_and_marks_dirty() {
        let (store, handle) = empty_store();
        let mut store = store.with_write_retries(2);
        handle.set_fail_writes(true);

        let err = store.upsert(draft("a", "Unsaved")).unwrap_err();
        assert!(matches!(err, StoreError::Write { attempts: 3, .. }));
        assert!(store.is_dirty());
        assert!(store.contains(&EntryId::from("a")));
        assert_eq!(handle.get(STORAGE_KEY).as_deref(), Some("[]"));

        handle.set_fail_writes(false);
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert!(handle.get(STORAGE_KEY).unwrap().contains("Unsaved"));
    }

    #[test]
    fn test_stats_and_tag_index() {
        let store = EntryStore::load(Box::new(MemoryBlobStore::new()));
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.published, 3);
        assert_eq!(stats.drafts, 0);

        let tags = store.tag_index();
        assert_eq!(tags.len(), 9);
        assert_eq!(tags.get("work"), Some(1));

        let names = store.available_tags();
        assert_eq!(names.first().map(String::as_str), Some("cooking"));
        assert_eq!(names.last().map(String::as_str), Some("writing"));
    }

    #[test]
    fn test_round_trip_through_file_backend() {
        let temp_dir = TempDir::new().unwrap();
        let mut entry = draft("persist", "Persistent");
        entry.tags = vec!["keep".into()];
        entry.content = "<p>Body content</p>".to_string();

        let stored = {
            let mut store = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));
            store.upsert(entry).unwrap()
        };

        let reopened = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));
        assert_eq!(reopened.get(&stored.id), Some(&stored));
        assert_eq!(reopened.len(), 4);
    }

    #[test]
    fn test_open_with_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let store = EntryStore::open(&config).unwrap();
        assert_eq!(store.len(), 3);
        assert!(temp_dir.path().join("blog-posts.json").exists());
    }
}
