//! Stats command handler

use anyhow::Result;

use inkwell_core::{Config, Journal};

use crate::output::{Output, OutputFormat};

/// Show entry counts and where they are stored
pub async fn show(journal: &Journal, config: &Config, output: &Output) -> Result<()> {
    let stats = journal.stats().await;
    output.print_stats(&stats);

    if output.format == OutputFormat::Human {
        println!();
        println!("Storage:");
        println!("  Backend:  {}", config.backend);
        println!("  Location: {}", config.data_dir.display());
        if journal.has_pending_writes().await {
            println!("  Unsaved changes are pending");
        }
    }

    Ok(())
}
