//! Inkwell Core Library
//!
//! This crate provides the core of Inkwell, a local single-user journal that
//! doubles as a small public blog: entries are drafted privately and become
//! visible on the blog once published.
//!
//! # Architecture
//!
//! - **EntryStore**: authoritative in-memory collection, rewritten in full to
//!   a blob store on every change
//! - **EditorSession**: staged edits to a single entry, committed as draft or
//!   published
//! - **Query**: pure filters, sorts and indexes over entry slices
//! - **Journal**: cloneable async handle tying the above together for views
//!
//! # Quick Start
//!
//! ```text
//! let journal = Journal::open(&Config::load()?)?;
//!
//! journal.begin_edit(None).await?;
//! journal.with_session(|s| s.set_title("Hello")).await?;
//! let entry = journal.publish().await?;
//!
//! let page = journal.public_view(&PublicRoute::Home).await;
//! ```
//!
//! # Modules
//!
//! - `journal`: Async facade (main entry point)
//! - `store`: Entry collection and persistence
//! - `session`: Editor session
//! - `query`: Filters, sorts, archive and tag indexes
//! - `view`: Dashboard and public blog read models
//! - `models`: Entry data structures
//! - `text`: Markup stripping and counting
//! - `storage`: Blob store backends
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod journal;
pub mod models;
pub mod query;
pub mod session;
pub mod storage;
pub mod store;
pub mod text;
pub mod view;

pub use config::{Backend, Config};
pub use error::{CommitError, JournalError, StoreError, ValidationError};
pub use journal::{Journal, SaveStatus};
pub use models::{Entry, EntryId, EntryStatus, StatusFilter};
pub use query::{ArchiveIndex, TagIndex};
pub use session::EditorSession;
pub use storage::{BlobStore, StorageError};
pub use store::{EntryStore, StoreStats};
pub use view::{DashboardFilter, PublicPage, PublicRoute};
