//! Journal facade
//!
//! `Journal` is the handle presentation layers hold. It owns the entry store
//! and the single editor session behind async mutexes and can be cloned
//! freely; every clone sees the same state.
//!
//! Locks are always taken session first, then store. Commits hold the session
//! lock for their whole duration, so two commits issued at once run one after
//! the other and the second sees the entry the first created.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CommitError, JournalError};
use crate::models::{Entry, EntryId};
use crate::query::TagIndex;
use crate::session::EditorSession;
use crate::store::{EntryStore, StoreStats};
use crate::view::{self, DashboardFilter, PublicPage, PublicRoute};

/// Outcome of the most recent commit, for a save indicator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved {
        at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
}

struct Inner {
    store: Mutex<EntryStore>,
    session: Mutex<Option<EditorSession>>,
    status: watch::Sender<SaveStatus>,
}

#[derive(Clone)]
pub struct Journal {
    inner: Arc<Inner>,
}

impl Journal {
    pub fn new(store: EntryStore) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                session: Mutex::new(None),
                status,
            }),
        }
    }

    /// Open the configured backend and wrap the loaded store
    pub fn open(config: &Config) -> Result<Self> {
        Ok(Self::new(EntryStore::open(config)?))
    }

    // ==================== Editing ====================

    /// Start editing an existing entry, or a new one when `id` is `None`.
    ///
    /// Replaces any session already open; its unsaved edits are dropped.
    pub async fn begin_edit(&self, id: Option<&EntryId>) -> Result<(), JournalError> {
        let mut session = self.inner.session.lock().await;
        let store = self.inner.store.lock().await;

        let entry = match id {
            Some(id) => Some(
                store
                    .get(id)
                    .ok_or_else(|| JournalError::NotFound { id: id.clone() })?,
            ),
            None => None,
        };

        if let Some(previous) = session.take() {
            if previous.has_unsaved_changes() {
                warn!(entry = ?previous.entry_id(), "replacing session with unsaved changes");
            }
        }
        *session = Some(EditorSession::begin(entry));
        self.set_status(SaveStatus::Idle);
        debug!(entry = ?id, "began editing");
        Ok(())
    }

    /// Run `f` against the open session
    pub async fn with_session<R>(
        &self,
        f: impl FnOnce(&mut EditorSession) -> R,
    ) -> Result<R, JournalError> {
        let mut session = self.inner.session.lock().await;
        let session = session.as_mut().ok_or(JournalError::NoActiveSession)?;
        Ok(f(session))
    }

    pub async fn is_editing(&self) -> bool {
        self.inner.session.lock().await.is_some()
    }

    /// Commit the open session as a draft; the session stays open
    pub async fn save_draft(&self) -> Result<Entry, JournalError> {
        let mut session = self.inner.session.lock().await;
        let editing = session.as_mut().ok_or(JournalError::NoActiveSession)?;

        self.set_status(SaveStatus::Saving);
        let result = {
            let mut store = self.inner.store.lock().await;
            editing.commit_save(&mut store)
        };
        self.record(result)
    }

    /// Commit the open session as published and close it
    pub async fn publish(&self) -> Result<Entry, JournalError> {
        let mut session = self.inner.session.lock().await;
        let editing = session.as_mut().ok_or(JournalError::NoActiveSession)?;

        self.set_status(SaveStatus::Saving);
        let result = {
            let mut store = self.inner.store.lock().await;
            editing.commit_publish(&mut store)
        };
        let entry = self.record(result)?;

        *session = None;
        info!(id = %entry.id, "published entry");
        Ok(entry)
    }

    /// Close the session without committing. Returns false when none was open.
    pub async fn cancel_edit(&self) -> bool {
        match self.inner.session.lock().await.take() {
            Some(session) => {
                session.discard();
                self.set_status(SaveStatus::Idle);
                true
            }
            None => false,
        }
    }

    /// Delete an entry, closing the session if it was editing that entry
    pub async fn delete_entry(&self, id: &EntryId) -> Result<(), JournalError> {
        let mut session = self.inner.session.lock().await;
        let mut store = self.inner.store.lock().await;

        if session
            .as_ref()
            .is_some_and(|s| s.entry_id() == Some(id))
        {
            *session = None;
            debug!(%id, "closed session for deleted entry");
        }

        store.delete(id)?;
        info!(%id, "deleted entry");
        Ok(())
    }

    fn record(&self, result: Result<Entry, CommitError>) -> Result<Entry, JournalError> {
        match result {
            Ok(entry) => {
                self.set_status(SaveStatus::Saved {
                    at: entry.updated_at,
                });
                Ok(entry)
            }
            Err(e) => {
                self.set_status(SaveStatus::Failed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    fn set_status(&self, status: SaveStatus) {
        self.inner.status.send_replace(status);
    }

    // ==================== Reading ====================

    pub async fn list_view(&self, filter: &DashboardFilter) -> Vec<Entry> {
        let store = self.inner.store.lock().await;
        view::list_view(store.list(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn public_view(&self, route: &PublicRoute) -> PublicPage {
        let store = self.inner.store.lock().await;
        view::public_view(store.list(), route)
    }

    pub async fn entries(&self) -> Vec<Entry> {
        self.inner.store.lock().await.list().to_vec()
    }

    pub async fn get(&self, id: &EntryId) -> Option<Entry> {
        self.inner.store.lock().await.get(id).cloned()
    }

    pub async fn stats(&self) -> StoreStats {
        self.inner.store.lock().await.stats()
    }

    /// Tags in use across all entries, for autocomplete
    pub async fn tag_index(&self) -> TagIndex {
        self.inner.store.lock().await.tag_index()
    }

    pub async fn available_tags(&self) -> Vec<String> {
        self.inner.store.lock().await.available_tags()
    }

    /// Tag suggestions for the open session's tag input
    pub async fn tag_suggestions(&self, input: &str) -> Result<Vec<String>, JournalError> {
        let session = self.inner.session.lock().await;
        let editing = session.as_ref().ok_or(JournalError::NoActiveSession)?;
        let available = self.inner.store.lock().await.tag_index();
        Ok(editing.tag_suggestions(&available, input))
    }

    /// Retry a write that failed earlier
    pub async fn flush(&self) -> Result<(), JournalError> {
        self.inner.store.lock().await.flush()?;
        Ok(())
    }

    pub async fn has_pending_writes(&self) -> bool {
        self.inner.store.lock().await.is_dirty()
    }

    /// Description of a problem found with the stored data at startup
    pub async fn load_warning(&self) -> Option<String> {
        let store = self.inner.store.lock().await;
        store.load_warning().map(|e| match e.recovery_suggestion() {
            Some(hint) => format!("{}\n{}", e, hint),
            None => e.to_string(),
        })
    }

    pub fn save_status(&self) -> SaveStatus {
        self.inner.status.borrow().clone()
    }

    /// Receiver notified on every save status change
    pub fn subscribe_status(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }
}
