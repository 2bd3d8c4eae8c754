//! Public blog command handlers

use anyhow::{bail, Result};

use inkwell_core::query::parse_month;
use inkwell_core::{Journal, PublicRoute};

use super::resolve_id;
use crate::output::Output;

/// Which page of the blog to render
#[derive(Debug, Default)]
pub struct BlogArgs {
    pub post: Option<String>,
    pub year: Option<i32>,
    pub month: Option<String>,
    pub tag: Option<String>,
}

/// Render a public blog page
pub async fn show(journal: &Journal, args: BlogArgs, output: &Output) -> Result<()> {
    let route = route_for(journal, args).await?;
    tracing::debug!(route = %route, "rendering blog page");
    let page = journal.public_view(&route).await;

    if let PublicRoute::Post(id) = &route {
        if page.is_empty() {
            bail!("Post not found: {}", id);
        }
    }

    output.print_page(&page);
    Ok(())
}

/// Print the archive index of published entries
pub async fn archive(journal: &Journal, output: &Output) -> Result<()> {
    let page = journal.public_view(&PublicRoute::Home).await;
    output.print_archive(&page.archive.display());
    Ok(())
}

async fn route_for(journal: &Journal, args: BlogArgs) -> Result<PublicRoute> {
    if let Some(post) = args.post {
        // Only published entries are candidates, so a draft id never resolves
        let published: Vec<_> = journal
            .entries()
            .await
            .into_iter()
            .filter(|e| e.is_published())
            .collect();
        return Ok(PublicRoute::Post(resolve_id(&post, &published)?));
    }

    if let Some(year) = args.year {
        if let Some(month) = &args.month {
            if parse_month(month).is_none() {
                bail!(
                    "Unknown month '{}'. Use a full month name such as 'January'.",
                    month
                );
            }
        }
        return Ok(PublicRoute::Archive {
            year,
            month: args.month,
        });
    }

    if let Some(tag) = args.tag {
        return Ok(PublicRoute::Tag(tag));
    }

    Ok(PublicRoute::Home)
}
