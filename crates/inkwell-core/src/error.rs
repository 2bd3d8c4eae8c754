//! Error types for the entry lifecycle
//!
//! Storage-level failures live in `storage::StorageError`; these wrap them
//! with what the store or session was doing at the time.

use thiserror::Error;

use crate::models::EntryId;
use crate::storage::StorageError;

/// A commit was refused before touching the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,
}

/// Entry Store failures
#[derive(Error, Debug)]
pub enum StoreError {
    /// The blob could not be read at all
    #[error("Failed to read stored entries '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: StorageError,
    },

    /// The blob was read but is not a valid entry collection
    #[error("Stored entries '{key}' are malformed: {details}")]
    Malformed { key: String, details: String },

    /// The blob was written by a newer version of Inkwell
    #[error(
        "Stored entries '{key}' use format version {found}; this build supports up to {supported}"
    )]
    UnsupportedVersion {
        key: String,
        found: u64,
        supported: u32,
    },

    /// Every write attempt failed; the change is only held in memory
    #[error("Changes not saved after {attempts} attempt(s): {source}")]
    Write {
        attempts: u32,
        #[source]
        source: StorageError,
    },

    /// Writing would overwrite stored data this build could not load
    #[error("Refusing to overwrite stored entries '{key}': {reason}")]
    Protected { key: String, reason: String },

    #[error("Failed to encode entries: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Suggestion for the user, when the underlying storage error has one
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Read { source, .. } | StoreError::Write { source, .. } => {
                source.recovery_suggestion()
            }
            StoreError::Malformed { .. } => Some(
                "The unreadable data was copied aside with a '.corrupt' suffix; \
                 sample entries were loaded instead.",
            ),
            StoreError::UnsupportedVersion { .. } => {
                Some("Upgrade Inkwell to open this data directory. Changes will not be saved.")
            }
            StoreError::Protected { .. } => {
                Some("Free up the data directory so the stored entries can be copied aside.")
            }
            StoreError::Encode(_) => None,
        }
    }
}

/// Failure of an editor session commit
#[derive(Error, Debug)]
pub enum CommitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures surfaced by the `Journal` facade
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Entry not found: {id}")]
    NotFound { id: EntryId },

    #[error("No entry is being edited")]
    NoActiveSession,

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl JournalError {
    /// True when the commit was refused for invalid input rather than failing
    pub fn is_validation(&self) -> bool {
        matches!(self, JournalError::Commit(CommitError::Validation(_)))
    }
}
