//! Inkwell CLI
//!
//! Command-line interface for Inkwell - write journal entries privately and
//! publish them to a small blog.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use inkwell_core::{Config, Journal, StatusFilter};

mod commands;
mod editor;
mod output;

use commands::blog::BlogArgs;
use commands::entry::{ContentSource, EditArgs};
use output::{Output, OutputFormat};

/// Environment variable holding the log level
const LOG_ENV: &str = "INKWELL_LOG";

#[derive(Parser)]
#[command(name = "inkwell")]
#[command(about = "Inkwell - a local journal that doubles as a blog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries, most recently updated first
    #[command(alias = "ls")]
    List {
        /// Filter by status (all, draft, published)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,
        /// Search titles, content and tags
        #[arg(long)]
        search: Option<String>,
        /// Only entries with any of these tags
        #[arg(short, long)]
        tag: Vec<String>,
        /// Group by the year and month each entry was created
        #[arg(long)]
        by_date: bool,
    },
    /// Show an entry
    Show {
        /// Entry ID (full ID or prefix)
        id: String,
    },
    /// Write a new entry
    #[command(alias = "add")]
    New {
        /// Entry title
        #[arg(short = 'T', long)]
        title: String,
        /// Entry content (opens editor if neither this nor --content-file is given)
        #[arg(short, long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read content from a file ('-' for stdin)
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Publish immediately instead of saving a draft
        #[arg(short, long)]
        publish: bool,
    },
    /// Edit an entry
    Edit {
        /// Entry ID (full ID or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New content
        #[arg(short, long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read new content from a file ('-' for stdin)
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Tags to add
        #[arg(long)]
        add_tag: Vec<String>,
        /// Tags to remove
        #[arg(long)]
        remove_tag: Vec<String>,
        /// Publish the entry
        #[arg(short, long, conflicts_with = "draft")]
        publish: bool,
        /// Move the entry back to drafts
        #[arg(long)]
        draft: bool,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID (full ID or prefix)
        id: String,
    },
    /// Show the public blog
    Blog {
        /// A single post
        #[arg(long, conflicts_with_all = ["year", "tag"])]
        post: Option<String>,
        /// Posts from one year
        #[arg(long, conflicts_with = "tag")]
        year: Option<i32>,
        /// Narrow --year to one month (e.g. January)
        #[arg(long, requires = "year")]
        month: Option<String>,
        /// Posts with a tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show published entries by year and month
    Archive,
    /// List all tags
    Tags {
        /// Count published entries only
        #[arg(long)]
        public: bool,
    },
    /// Show entry counts
    Stats,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, write_retries, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands must work even when the stored config is broken
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let journal = Journal::open(&config)?;
    if let Some(warning) = journal.load_warning().await {
        output.warning(&warning);
    }

    match cli.command {
        Commands::List {
            status,
            search,
            tag,
            by_date,
        } => commands::entry::list(&journal, status, search, tag, by_date, &output).await,
        Commands::Show { id } => commands::entry::show(&journal, id, &output).await,
        Commands::New {
            title,
            content,
            content_file,
            tag,
            publish,
        } => {
            let source = ContentSource {
                content,
                content_file,
            };
            commands::entry::create(&journal, title, source, tag, publish, &output).await
        }
        Commands::Edit {
            id,
            title,
            content,
            content_file,
            add_tag,
            remove_tag,
            publish,
            draft,
        } => {
            let args = EditArgs {
                title,
                source: ContentSource {
                    content,
                    content_file,
                },
                add_tags: add_tag,
                remove_tags: remove_tag,
                publish,
                draft,
            };
            commands::entry::edit(&journal, id, args, &output).await
        }
        Commands::Delete { id } => commands::entry::delete(&journal, id, &output).await,
        Commands::Blog {
            post,
            year,
            month,
            tag,
        } => {
            let args = BlogArgs {
                post,
                year,
                month,
                tag,
            };
            commands::blog::show(&journal, args, &output).await
        }
        Commands::Archive => commands::blog::archive(&journal, &output).await,
        Commands::Tags { public } => commands::tag::list(&journal, public, &output).await,
        Commands::Stats => commands::stats::show(&journal, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Install the tracing subscriber
///
/// Level comes from INKWELL_LOG (default `warn`). Logs go to the configured
/// log file, or stderr when none is set.
fn init_logging(config: &Config) {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!("inkwell_core={},inkwell_cli={}", level, level));

    let Some(log_path) = &config.log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    tracing::info!("logging to {:?}", log_path);
}
