//! Editor session
//!
//! An `EditorSession` stages edits to one entry, new or existing, without
//! touching the store until `commit_save` or `commit_publish`. Commits take
//! `&mut self`, so a single session can never have two commits in flight.

use chrono::Utc;
use tracing::debug;

use crate::error::{CommitError, ValidationError};
use crate::models::{Entry, EntryId, EntryStatus};
use crate::query::TagIndex;
use crate::store::EntryStore;
use crate::text;

/// Working copy of one entry
#[derive(Debug, Clone)]
pub struct EditorSession {
    /// The stored entry being edited; `None` until a new entry is first committed
    original: Option<Entry>,
    title: String,
    content: String,
    tags: Vec<String>,
    unsaved: bool,
}

impl EditorSession {
    /// Start editing `entry`, or a blank new entry when `None`
    pub fn begin(entry: Option<&Entry>) -> Self {
        match entry {
            Some(entry) => Self {
                original: Some(entry.clone()),
                title: entry.title.clone(),
                content: entry.content.clone(),
                tags: entry.tags.clone(),
                unsaved: false,
            },
            None => Self {
                original: None,
                title: String::new(),
                content: String::new(),
                tags: Vec::new(),
                unsaved: false,
            },
        }
    }

    /// True until the first successful commit of a new entry
    pub fn is_new(&self) -> bool {
        self.original.is_none()
    }

    pub fn original(&self) -> Option<&Entry> {
        self.original.as_ref()
    }

    pub fn entry_id(&self) -> Option<&EntryId> {
        self.original.as_ref().map(|e| &e.id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Edits made since the session began or last committed
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.unsaved = true;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.unsaved = true;
    }

    /// Add a tag; ignored when blank or already present
    pub fn add_tag(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.tags.iter().any(|t| t == name) {
            return;
        }
        self.tags.push(name.to_string());
        self.unsaved = true;
    }

    /// Remove a tag; ignored when absent
    pub fn remove_tag(&mut self, name: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == name) {
            self.tags.remove(pos);
            self.unsaved = true;
        }
    }

    /// Live word count of the working content
    pub fn word_count(&self) -> usize {
        text::word_count(&self.content)
    }

    /// Live character count of the working content, markup excluded
    pub fn char_count(&self) -> usize {
        text::char_count(&self.content)
    }

    /// Autocomplete candidates for the tag input, skipping tags already set
    pub fn tag_suggestions(&self, available: &TagIndex, input: &str) -> Vec<String> {
        available.suggest(input, &self.tags)
    }

    /// Commit the working copy as a draft
    pub fn commit_save(&mut self, store: &mut EntryStore) -> Result<Entry, CommitError> {
        self.commit(store, EntryStatus::Draft)
    }

    /// Commit the working copy as published
    pub fn commit_publish(&mut self, store: &mut EntryStore) -> Result<Entry, CommitError> {
        self.commit(store, EntryStatus::Published)
    }

    /// Drop the working copy without touching the store
    pub fn discard(self) {
        debug!(entry = ?self.entry_id(), unsaved = self.unsaved, "discarded editor session");
    }

    fn commit(
        &mut self,
        store: &mut EntryStore,
        status: EntryStatus,
    ) -> Result<Entry, CommitError> {
        let entry = self.build(status)?;
        let id = entry.id.clone();

        let result = store.upsert(entry);

        // A failed write still leaves the entry in the store's memory, so
        // later commits must update it rather than create another.
        if let Some(stored) = store.get(&id) {
            self.original = Some(stored.clone());
        }

        let stored = result?;
        self.unsaved = false;
        debug!(id = %stored.id, status = %stored.status, "committed entry");
        Ok(stored)
    }

    fn build(&self, status: EntryStatus) -> Result<Entry, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let now = Utc::now();
        let mut entry = match &self.original {
            Some(original) => original.clone(),
            None => {
                let mut fresh = Entry::new_draft();
                fresh.created_at = now;
                fresh
            }
        };

        entry.title = self.title.clone();
        entry.content = self.content.clone();
        entry.tags = self.tags.clone();
        entry.status = status;
        entry.is_public = status == EntryStatus::Published;
        entry.word_count = text::word_count(&self.content);
        entry.updated_at = now;
        if status == EntryStatus::Published && entry.published_date.is_none() {
            entry.published_date = Some(now);
        }

        Ok(entry)
    }
}
