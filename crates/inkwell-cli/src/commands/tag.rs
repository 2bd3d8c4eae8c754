//! Tag command handlers

use anyhow::Result;

use inkwell_core::{Journal, PublicRoute};

use crate::output::Output;

/// List tags with usage counts, most used first
///
/// With `public_only`, counts cover published entries only.
pub async fn list(journal: &Journal, public_only: bool, output: &Output) -> Result<()> {
    let index = if public_only {
        journal.public_view(&PublicRoute::Home).await.tags
    } else {
        journal.tag_index().await
    };
    output.print_tags(&index.by_count());
    Ok(())
}
