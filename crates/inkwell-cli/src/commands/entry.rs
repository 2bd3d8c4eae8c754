//! Entry command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use inkwell_core::query::group_by_created;
use inkwell_core::{DashboardFilter, EntryStatus, Journal, StatusFilter};

use super::resolve_id;
use crate::editor::{confirm, edit_text, is_interactive, read_content_file};
use crate::output::Output;

/// Where new content comes from
pub struct ContentSource {
    pub content: Option<String>,
    pub content_file: Option<PathBuf>,
}

impl ContentSource {
    fn read(self) -> Result<Option<String>> {
        match (self.content, self.content_file) {
            (Some(content), _) => Ok(Some(content)),
            (None, Some(path)) => read_content_file(&path).map(Some),
            (None, None) => Ok(None),
        }
    }
}

/// Changes requested by `inkwell edit`
pub struct EditArgs {
    pub title: Option<String>,
    pub source: ContentSource,
    pub add_tags: Vec<String>,
    pub remove_tags: Vec<String>,
    pub publish: bool,
    pub draft: bool,
}

/// List entries for the dashboard
///
/// With `by_date` the filtered entries are grouped by creation year and month.
pub async fn list(
    journal: &Journal,
    status: StatusFilter,
    query: Option<String>,
    tags: Vec<String>,
    by_date: bool,
    output: &Output,
) -> Result<()> {
    let filter = DashboardFilter {
        status,
        query: query.unwrap_or_default(),
        tags,
    };
    let entries = journal.list_view(&filter).await;
    if by_date {
        output.print_by_date(&group_by_created(&entries));
    } else {
        output.print_entries(&entries);
    }
    Ok(())
}

/// Show a single entry
pub async fn show(journal: &Journal, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&id, &journal.entries().await)?;
    let entry = journal
        .get(&id)
        .await
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;
    output.print_entry(&entry);
    Ok(())
}

/// Create a new entry
pub async fn create(
    journal: &Journal,
    title: String,
    source: ContentSource,
    tags: Vec<String>,
    publish: bool,
    output: &Output,
) -> Result<()> {
    let content = match source.read()? {
        Some(content) => content,
        None if output.should_prompt() && is_interactive() => edit_text("")?,
        None => String::new(),
    };

    journal.begin_edit(None).await?;
    journal
        .with_session(|session| {
            session.set_title(title);
            session.set_content(content);
            for tag in &tags {
                session.add_tag(tag);
            }
        })
        .await?;

    let entry = if publish {
        journal.publish().await
    } else {
        journal.save_draft().await
    }
    .context("Failed to save entry")?;

    output.success(&format!("Created {}: {}", entry.status, entry.id));
    output.print_entry(&entry);
    Ok(())
}

/// Edit an existing entry
///
/// The entry keeps its current status unless `--publish` or `--draft` is given.
pub async fn edit(journal: &Journal, id: String, args: EditArgs, output: &Output) -> Result<()> {
    let id = resolve_id(&id, &journal.entries().await)?;
    journal.begin_edit(Some(&id)).await?;

    let nothing_requested = args.title.is_none()
        && args.source.content.is_none()
        && args.source.content_file.is_none()
        && args.add_tags.is_empty()
        && args.remove_tags.is_empty();

    let content = match args.source.read()? {
        Some(content) => Some(content),
        None if nothing_requested && output.should_prompt() && is_interactive() => {
            let current = journal
                .with_session(|session| session.content().to_string())
                .await?;
            Some(edit_text(&current)?)
        }
        None => None,
    };

    let (changed, was_published) = journal
        .with_session(|session| {
            if let Some(title) = args.title {
                if title != session.title() {
                    session.set_title(title);
                }
            }
            if let Some(content) = content {
                if content != session.content() {
                    session.set_content(content);
                }
            }
            for tag in &args.remove_tags {
                session.remove_tag(tag);
            }
            for tag in &args.add_tags {
                session.add_tag(tag);
            }
            let was_published = session
                .original()
                .is_some_and(|e| e.status == EntryStatus::Published);
            (session.has_unsaved_changes(), was_published)
        })
        .await?;

    let publish = args.publish || (was_published && !args.draft);
    let status_change = args.publish != was_published && (args.publish || args.draft);

    if !changed && !status_change {
        journal.cancel_edit().await;
        output.message("No changes.");
        return Ok(());
    }

    let entry = if publish {
        journal.publish().await
    } else {
        journal.save_draft().await
    }
    .context("Failed to save entry")?;
    journal.cancel_edit().await;

    output.success(&format!("Updated entry: {}", entry.id));
    output.print_entry(&entry);
    Ok(())
}

/// Delete an entry
pub async fn delete(journal: &Journal, id: String, output: &Output) -> Result<()> {
    let id = resolve_id(&id, &journal.entries().await)?;
    let Some(entry) = journal.get(&id).await else {
        bail!("Entry not found: {}", id);
    };

    if output.should_prompt() {
        println!("Delete entry: {} - {}", entry.id, entry.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    journal
        .delete_entry(&id)
        .await
        .context("Failed to delete entry")?;

    output.success(&format!("Deleted entry: {}", id));
    Ok(())
}
