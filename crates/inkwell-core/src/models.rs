//! Data models for Inkwell
//!
//! Defines the sole persisted entity, `Entry`, together with its identifier
//! and publication status. Field names serialize in camelCase so the stored
//! blob keeps the layout the browser version of the journal wrote.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::text;

/// Opaque, immutable entry identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Publication state of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Published,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "draft",
            EntryStatus::Published => "published",
        }
    }

    /// Human label shown next to an entry in listings
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Draft => "Draft",
            EntryStatus::Published => "Published",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(EntryStatus::Draft),
            "published" => Ok(EntryStatus::Published),
            other => Err(format!(
                "unknown status '{}', expected 'draft' or 'published'",
                other
            )),
        }
    }
}

/// Status selector used by the dashboard; `All` keeps every entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(EntryStatus),
}

impl StatusFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => entry.status == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// A journal or blog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Unique identifier, assigned at creation
    pub id: EntryId,
    /// Plain-text title
    pub title: String,
    /// Rich markup body, stored verbatim
    pub content: String,
    /// Draft or published
    pub status: EntryStatus,
    /// Mirrors `status == Published`
    #[serde(default)]
    pub is_public: bool,
    /// Tags, duplicate-free
    #[serde(default)]
    pub tags: Vec<String>,
    /// Words in `content` once markup is stripped
    #[serde(default)]
    pub word_count: usize,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    /// First time the entry was published
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_date: Option<DateTime<Utc>>,
}

impl Entry {
    /// Create an empty in-memory draft; it is not stored until committed
    pub fn new_draft() -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::generate(),
            title: String::new(),
            content: String::new(),
            status: EntryStatus::Draft,
            is_public: false,
            tags: Vec::new(),
            word_count: 0,
            created_at: now,
            updated_at: now,
            published_date: None,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == EntryStatus::Published
    }

    /// Date used by the public views: publication date, else last update
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_date.unwrap_or(self.updated_at)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Re-derive the denormalized fields from the primary ones.
    ///
    /// Trims tags and drops blank or duplicate ones (first occurrence wins),
    /// recomputes `is_public` and `word_count`, and backfills
    /// `published_date` for published entries that predate the field.
    pub fn normalize(&mut self) {
        let mut seen = HashSet::with_capacity(self.tags.len());
        self.tags = std::mem::take(&mut self.tags)
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
            .collect();

        self.is_public = self.is_published();
        self.word_count = text::word_count(&self.content);

        if self.is_published() && self.published_date.is_none() {
            self.published_date = Some(self.updated_at);
        }
    }
}

/// Timestamp (de)serialization.
///
/// Writes RFC 3339 UTC. Reads RFC 3339 with any offset, and also the naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` form older blobs contain, taken as UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc()),
        }
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|r| parse(&r).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
