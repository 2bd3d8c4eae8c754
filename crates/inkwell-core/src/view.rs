//! Read models for the two presentation surfaces
//!
//! The dashboard sees every entry through a [`DashboardFilter`]; the public
//! blog only ever sees published entries, selected by a [`PublicRoute`].

use std::fmt;

use crate::models::{Entry, EntryId, EntryStatus, StatusFilter};
use crate::query::{
    build_archive_index, build_tag_index, filter_by_status, filter_by_tag_name, filter_by_tags,
    filter_by_year_month, find_by_id, month_name, parse_month, search, sort_for_dashboard,
    sort_for_public, ArchiveIndex, TagIndex,
};

/// Dashboard filter controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    pub status: StatusFilter,
    pub query: String,
    pub tags: Vec<String>,
}

impl DashboardFilter {
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Dashboard list: status, then search, then tags, newest update first
pub fn list_view<'a>(entries: &'a [Entry], filter: &DashboardFilter) -> Vec<&'a Entry> {
    let by_status = filter_by_status(entries, filter.status);
    let matching = search(by_status, &filter.query);
    let tagged = filter_by_tags(matching, &filter.tags);
    sort_for_dashboard(tagged)
}

/// Which public page is being rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicRoute {
    Home,
    Post(EntryId),
    Archive { year: i32, month: Option<String> },
    Tag(String),
}

impl PublicRoute {
    /// Heading shown above the page
    pub fn title(&self) -> String {
        match self {
            PublicRoute::Home => "Blog".to_string(),
            PublicRoute::Post(_) => "Blog Post".to_string(),
            PublicRoute::Archive { year, month: None } => format!("Archive: {}", year),
            PublicRoute::Archive {
                year,
                month: Some(month),
            } => {
                // Normalise capitalisation when the name is recognised
                let name = parse_month(month)
                    .and_then(month_name)
                    .unwrap_or(month.as_str());
                format!("Archive: {} {}", name, year)
            }
            PublicRoute::Tag(tag) => format!("Tag: {}", tag),
        }
    }
}

impl fmt::Display for PublicRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicRoute::Home => write!(f, "/blog"),
            PublicRoute::Post(id) => write!(f, "/blog/post/{}", id),
            PublicRoute::Archive { year, month: None } => write!(f, "/blog/archive/{}", year),
            PublicRoute::Archive {
                year,
                month: Some(month),
            } => write!(f, "/blog/archive/{}/{}", year, month),
            PublicRoute::Tag(tag) => write!(f, "/blog/tag/{}", tag),
        }
    }
}

/// Everything a public page renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPage {
    pub title: String,
    /// Entries selected by the route, newest first
    pub entries: Vec<Entry>,
    /// Archive sidebar over every published entry
    pub archive: ArchiveIndex,
    /// Tag sidebar over every published entry
    pub tags: TagIndex,
}

impl PublicPage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn public_view(entries: &[Entry], route: &PublicRoute) -> PublicPage {
    let published = filter_by_status(entries, StatusFilter::Only(EntryStatus::Published));

    let selected: Vec<&Entry> = match route {
        PublicRoute::Home => published.clone(),
        PublicRoute::Post(id) => find_by_id(published.iter().copied(), id)
            .into_iter()
            .collect(),
        PublicRoute::Archive { year, month } => {
            filter_by_year_month(published.iter().copied(), *year, month.as_deref())
        }
        PublicRoute::Tag(tag) => filter_by_tag_name(published.iter().copied(), tag),
    };

    PublicPage {
        title: route.title(),
        entries: sort_for_public(selected).into_iter().cloned().collect(),
        archive: build_archive_index(published.iter().copied()),
        tags: build_tag_index(published.iter().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, status: EntryStatus, day: u32, tags: &[&str]) -> Entry {
        let mut entry = Entry::new_draft();
        entry.id = EntryId::from(id);
        entry.title = format!("Entry {}", id);
        entry.content = format!("<p>content of {}</p>", id);
        entry.status = status;
        entry.tags = tags.iter().map(|t| t.to_string()).collect();
        entry.created_at = Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap();
        entry.updated_at = entry.created_at;
        entry.normalize();
        entry
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("a", EntryStatus::Published, 3, &["work"]),
            entry("b", EntryStatus::Draft, 9, &["work", "secret"]),
            entry("c", EntryStatus::Published, 5, &["Cooking"]),
            entry("d", EntryStatus::Published, 4, &[]),
        ]
    }

    fn ids(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn test_list_view_default_shows_everything_by_update() {
        let entries = sample();
        let visible = list_view(&entries, &DashboardFilter::default());
        assert_eq!(ids(&visible), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_list_view_combines_filters() {
        let entries = sample();
        let filter = DashboardFilter::default()
            .with_status(StatusFilter::Only(EntryStatus::Published))
            .with_tag("work");
        assert_eq!(ids(&list_view(&entries, &filter)), vec!["a"]);

        let filter = DashboardFilter::default().with_query("CONTENT OF C");
        assert_eq!(ids(&list_view(&entries, &filter)), vec!["c"]);

        let filter = DashboardFilter::default()
            .with_status(StatusFilter::Only(EntryStatus::Draft))
            .with_query("secret");
        assert_eq!(ids(&list_view(&entries, &filter)), vec!["b"]);
    }

    #[test]
    fn test_public_home_hides_drafts() {
        let page = public_view(&sample(), &PublicRoute::Home);
        assert_eq!(page.title, "Blog");
        let got: Vec<&str> = page.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(got, vec!["c", "d", "a"]);
        assert_eq!(page.tags.get("secret"), None);
        assert_eq!(page.archive.get(2025, "January"), Some(3));
    }

    #[test]
    fn test_public_post_never_exposes_drafts() {
        let entries = sample();
        let page = public_view(&entries, &PublicRoute::Post(EntryId::from("a")));
        assert_eq!(page.title, "Blog Post");
        assert_eq!(page.entries.len(), 1);

        let page = public_view(&entries, &PublicRoute::Post(EntryId::from("b")));
        assert!(page.is_empty());
    }

    #[test]
    fn test_public_archive_routes() {
        let entries = sample();
        let year = PublicRoute::Archive {
            year: 2025,
            month: None,
        };
        assert_eq!(year.title(), "Archive: 2025");
        assert_eq!(public_view(&entries, &year).entries.len(), 3);

        let month = PublicRoute::Archive {
            year: 2025,
            month: Some("january".to_string()),
        };
        assert_eq!(month.title(), "Archive: January 2025");
        assert_eq!(public_view(&entries, &month).entries.len(), 3);

        let bogus = PublicRoute::Archive {
            year: 2025,
            month: Some("Smarch".to_string()),
        };
        let page = public_view(&entries, &bogus);
        assert!(page.is_empty());
        assert!(!page.archive.is_empty());
    }

    #[test]
    fn test_public_tag_route_ignores_case() {
        let page = public_view(&sample(), &PublicRoute::Tag("cooking".to_string()));
        assert_eq!(page.title, "Tag: cooking");
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].id.as_str(), "c");
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(PublicRoute::Home.to_string(), "/blog");
        assert_eq!(
            PublicRoute::Archive {
                year: 2025,
                month: Some("January".into())
            }
            .to_string(),
            "/blog/archive/2025/January"
        );
        assert_eq!(PublicRoute::Tag("work".into()).to_string(), "/blog/tag/work");
    }
}
