//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use inkwell_core::query::{ArchiveYear, CreatedYear};
use inkwell_core::text::{preview, strip_markup};
use inkwell_core::{Entry, PublicPage, StoreStats};

/// Characters of stripped content shown under each blog entry
const BLOG_PREVIEW_CHARS: usize = 200;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single entry in full
    pub fn print_entry(&self, entry: &Entry) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", entry.id);
                println!("Title:     {}", entry.title);
                println!("Status:    {}", entry.status.label());
                if !entry.tags.is_empty() {
                    println!("Tags:      {}", entry.tags.join(", "));
                }
                println!("Words:     {}", entry.word_count);
                println!("Created:   {}", entry.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:   {}", entry.updated_at.format("%Y-%m-%d %H:%M"));
                if let Some(published) = entry.published_date {
                    println!("Published: {}", published.format("%Y-%m-%d %H:%M"));
                }

                let body = strip_markup(&entry.content);
                if !body.is_empty() {
                    println!();
                    println!("{}", body);
                }
            }
            OutputFormat::Json => print_json(entry),
            OutputFormat::Quiet => println!("{}", entry.id),
        }
    }

    /// Print the dashboard list
    pub fn print_entries(&self, entries: &[Entry]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No entries found.");
                    return;
                }
                for entry in entries {
                    let tags = if entry.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", entry.tags.join(", "))
                    };
                    println!(
                        "{} | {:<9} | {} | {}{}",
                        short_id(entry),
                        entry.status.label(),
                        entry.updated_at.format("%Y-%m-%d"),
                        truncate(&entry.title, 40),
                        tags
                    );
                }
                println!("\n{} entr{}", entries.len(), plural_y(entries.len()));
            }
            OutputFormat::Json => print_json(&entries),
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print entries grouped by creation year and month
    pub fn print_by_date(&self, years: &[CreatedYear<'_>]) {
        match self.format {
            OutputFormat::Human => {
                if years.is_empty() {
                    println!("No entries found.");
                    return;
                }
                for year in years {
                    println!("{}", year.year);
                    for month in &year.months {
                        println!("  {} ({})", month.name, month.entries.len());
                        for entry in &month.entries {
                            println!(
                                "    {} | {:<9} | {}",
                                short_id(entry),
                                entry.status.label(),
                                truncate(&entry.title, 40)
                            );
                        }
                    }
                }
            }
            OutputFormat::Json => print_json(&years),
            OutputFormat::Quiet => {
                for month in years.iter().flat_map(|y| &y.months) {
                    for entry in &month.entries {
                        println!("{}", entry.id);
                    }
                }
            }
        }
    }

    /// Print a public blog page
    pub fn print_page(&self, page: &PublicPage) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", page.title);
                println!("{}", "=".repeat(page.title.chars().count()));
                println!();

                if page.entries.is_empty() {
                    println!("No posts found.");
                    return;
                }

                let single = page.entries.len() == 1;
                for entry in &page.entries {
                    println!(
                        "{}  ({})",
                        entry.title,
                        entry.display_date().format("%B %-d, %Y")
                    );
                    if !entry.tags.is_empty() {
                        println!("  #{}", entry.tags.join(" #"));
                    }
                    if single {
                        println!();
                        println!("{}", strip_markup(&entry.content));
                    } else {
                        let teaser = preview(&entry.content, BLOG_PREVIEW_CHARS);
                        println!("  {}", truncate_line(&teaser, 120));
                    }
                    println!();
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "title": page.title,
                "entries": page.entries,
                "archive": page.archive.display(),
                "tags": page.tags.to_map(),
            })),
            OutputFormat::Quiet => {
                for entry in &page.entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print the archive, newest year first
    pub fn print_archive(&self, years: &[ArchiveYear]) {
        match self.format {
            OutputFormat::Human => {
                if years.is_empty() {
                    println!("No published entries.");
                    return;
                }
                for year in years {
                    println!("{} ({})", year.year, year.total);
                    for month in &year.months {
                        println!("  {} ({})", month.name, month.count);
                    }
                }
            }
            OutputFormat::Json => print_json(&years),
            OutputFormat::Quiet => {
                for year in years {
                    for month in &year.months {
                        println!("{} {}", year.year, month.name);
                    }
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(&str, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    pub fn print_stats(&self, stats: &StoreStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Entries:   {}", stats.total);
                println!("Published: {}", stats.published);
                println!("Drafts:    {}", stats.drafts);
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.total),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// First eight characters of the id, enough to pass back to `show`
fn short_id(entry: &Entry) -> &str {
    let id = entry.id.as_str();
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
