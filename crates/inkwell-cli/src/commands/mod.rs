//! Command handlers

pub mod blog;
pub mod config;
pub mod entry;
pub mod stats;
pub mod tag;

use anyhow::{bail, Result};

use inkwell_core::{Entry, EntryId};

/// Resolve a full entry id or a unique prefix of one
pub fn resolve_id(id: &str, entries: &[Entry]) -> Result<EntryId> {
    let wanted = EntryId::from(id);
    if entries.iter().any(|e| e.id == wanted) {
        return Ok(wanted);
    }

    let matches: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.id.as_str().starts_with(id))
        .collect();

    match matches.as_slice() {
        [] => bail!("No entry found matching: {}", id),
        [entry] => Ok(entry.id.clone()),
        _ => {
            eprintln!("Multiple entries match '{}':", id);
            for entry in &matches {
                eprintln!("  {} - {}", entry.id, entry.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
