//! Query and filter engine
//!
//! Pure functions over a list of entries. Every function borrows its input,
//! never mutates an entry, and returns references in input order unless it is
//! explicitly a sort. They compose by feeding one result into the next:
//!
//! ```ignore
//! let visible = sort_for_dashboard(search(filter_by_status(&entries, filter), "pasta"));
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Entry, EntryId, StatusFilter};
use crate::text::strip_markup;

/// Full English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Month name for a 1-based month number
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// 1-based month number for a full month name, ignoring case
pub fn parse_month(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|idx| idx as u32 + 1)
}

/// Order month names latest-first (December before January).
/// Unrecognised names sort after January.
pub fn compare_months_desc(a: &str, b: &str) -> Ordering {
    let rank = |name: &str| parse_month(name).unwrap_or(0);
    rank(b).cmp(&rank(a))
}

// ==================== Filters ====================

pub fn filter_by_status<'a, I>(entries: I, status: StatusFilter) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().filter(|e| status.matches(e)).collect()
}

/// Case-insensitive substring search over title, stripped content and tags.
///
/// A blank query returns the input unchanged.
pub fn search<'a, I>(entries: I, query: &str) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    if query.trim().is_empty() {
        return entries.into_iter().collect();
    }
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| {
            entry.title.to_lowercase().contains(&needle)
                || strip_markup(&entry.content)
                    .to_lowercase()
                    .contains(&needle)
                || entry
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Keep entries carrying at least one of `tags` (exact, case-sensitive).
///
/// An empty tag set returns the input unchanged.
pub fn filter_by_tags<'a, I, T>(entries: I, tags: &[T]) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
    T: AsRef<str>,
{
    if tags.is_empty() {
        return entries.into_iter().collect();
    }
    entries
        .into_iter()
        .filter(|entry| tags.iter().any(|wanted| entry.has_tag(wanted.as_ref())))
        .collect()
}

/// Keep entries whose display date falls in `year` and, when given, in the
/// named month. An unknown month name matches nothing.
pub fn filter_by_year_month<'a, I>(entries: I, year: i32, month: Option<&str>) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let month = match month {
        Some(name) => match parse_month(name) {
            Some(number) => Some(number),
            None => return Vec::new(),
        },
        None => None,
    };
    entries
        .into_iter()
        .filter(|entry| {
            let date = entry.display_date();
            date.year() == year && month.map_or(true, |m| date.month() == m)
        })
        .collect()
}

/// Keep entries having a tag equal to `tag_name`, ignoring case.
///
/// The caller is responsible for URL-decoding the name.
pub fn filter_by_tag_name<'a, I>(entries: I, tag_name: &str) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let wanted = tag_name.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| entry.tags.iter().any(|t| t.to_lowercase() == wanted))
        .collect()
}

pub fn find_by_id<'a, I>(entries: I, id: &EntryId) -> Option<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().find(|e| &e.id == id)
}

// ==================== Sorting ====================

/// Dashboard order: most recently updated first
pub fn sort_for_dashboard<'a, I>(entries: I) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut sorted: Vec<&Entry> = entries.into_iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted
}

/// Public blog order: most recently published first, falling back to the
/// update time for entries without a publication date
pub fn sort_for_public<'a, I>(entries: I) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut sorted: Vec<&Entry> = entries.into_iter().collect();
    sorted.sort_by(|a, b| b.display_date().cmp(&a.display_date()));
    sorted
}

// ==================== Indexes ====================

/// Year -> month -> entry count, keyed by each entry's display date (UTC)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    years: BTreeMap<i32, BTreeMap<u32, usize>>,
}

/// One year of the archive in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveYear {
    pub year: i32,
    pub total: usize,
    pub months: Vec<ArchiveMonth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveMonth {
    pub name: &'static str,
    pub count: usize,
}

impl ArchiveIndex {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Count for a year and full month name (case-insensitive)
    pub fn get(&self, year: i32, month: &str) -> Option<usize> {
        let month = parse_month(month)?;
        self.years.get(&year)?.get(&month).copied()
    }

    pub fn year_total(&self, year: i32) -> usize {
        self.years
            .get(&year)
            .map(|months| months.values().sum())
            .unwrap_or(0)
    }

    /// Plain mapping of year -> month name -> count
    pub fn to_map(&self) -> BTreeMap<i32, BTreeMap<&'static str, usize>> {
        self.years
            .iter()
            .map(|(year, months)| {
                let named = months
                    .iter()
                    .filter_map(|(m, count)| month_name(*m).map(|name| (name, *count)))
                    .collect();
                (*year, named)
            })
            .collect()
    }

    /// Years newest first, months December to January
    pub fn display(&self) -> Vec<ArchiveYear> {
        let mut years: Vec<ArchiveYear> = self
            .to_map()
            .into_iter()
            .map(|(year, months)| {
                let mut months: Vec<ArchiveMonth> = months
                    .into_iter()
                    .map(|(name, count)| ArchiveMonth { name, count })
                    .collect();
                months.sort_by(|a, b| compare_months_desc(a.name, b.name));
                ArchiveYear {
                    year,
                    total: months.iter().map(|m| m.count).sum(),
                    months,
                }
            })
            .collect();
        years.sort_by(|a, b| b.year.cmp(&a.year));
        years
    }
}

pub fn build_archive_index<'a, I>(entries: I) -> ArchiveIndex
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut index = ArchiveIndex::default();
    for entry in entries {
        let date = entry.display_date();
        *index
            .years
            .entry(date.year())
            .or_default()
            .entry(date.month())
            .or_insert(0) += 1;
    }
    index
}

/// One year of the dashboard's by-date grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedYear<'a> {
    pub year: i32,
    pub months: Vec<CreatedMonth<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedMonth<'a> {
    pub name: &'static str,
    pub entries: Vec<&'a Entry>,
}

/// Group entries, drafts included, by creation year and month (UTC).
///
/// Years newest first, months December to January, and entries within a
/// month newest created first.
pub fn group_by_created<'a, I>(entries: I) -> Vec<CreatedYear<'a>>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut grouped: BTreeMap<i32, BTreeMap<u32, Vec<&'a Entry>>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry(entry.created_at.year())
            .or_default()
            .entry(entry.created_at.month())
            .or_default()
            .push(entry);
    }

    grouped
        .into_iter()
        .rev()
        .map(|(year, months)| CreatedYear {
            year,
            months: months
                .into_iter()
                .rev()
                .filter_map(|(month, mut entries)| {
                    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                    month_name(month).map(|name| CreatedMonth { name, entries })
                })
                .collect(),
        })
        .collect()
}

/// Tag -> number of entries carrying it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    counts: BTreeMap<String, usize>,
}

impl TagIndex {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn get(&self, tag: &str) -> Option<usize> {
        self.counts.get(tag).copied()
    }

    /// Tag names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        self.counts.keys().map(String::as_str).collect()
    }

    /// Most used first; equal counts ordered by name
    pub fn by_count(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn to_map(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Autocomplete candidates: names containing `input` (ignoring case),
    /// minus those in `exclude`, alphabetical. Blank input yields nothing.
    pub fn suggest<T: AsRef<str>>(&self, input: &str, exclude: &[T]) -> Vec<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.counts
            .keys()
            .filter(|tag| tag.to_lowercase().contains(&needle))
            .filter(|tag| !exclude.iter().any(|e| e.as_ref() == tag.as_str()))
            .cloned()
            .collect()
    }
}

pub fn build_tag_index<'a, I>(entries: I) -> TagIndex
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut index = TagIndex::default();
    for entry in entries {
        for tag in &entry.tags {
            *index.counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    index
}
