//! quoth CLI
//!
//! Command-line interface for quoth - a local-first quote collection.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quoth_core::sync::RemoteSource;
use quoth_core::{Config, LoadStatus, QuoteBook};

mod commands;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quoth")]
#[command(about = "quoth - Local-first quote collection")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use an alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show this session's quote (default)
    Show,
    /// Show a different random quote
    #[command(alias = "random")]
    Next {
        /// Pick from this category and remember the choice
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Select the category used by `next`
    Filter {
        /// Category name, or "all"
        category: String,
    },
    /// Export all quotes to a JSON file
    Export {
        /// Target file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// JSON file holding an array of {text, category}
        file: PathBuf,
    },
    /// Remove every quote
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Fetch server quotes once and merge them
    Sync,
    /// Sync periodically until interrupted
    Watch,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (storage locations, counts, sync settings)
    Status,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, session_dir, sync_url, sync_enabled,
        /// sync_interval_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the book
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let mut book = QuoteBook::open_with_config(&config);
    if book.load_status() == LoadStatus::Rejected {
        output.warning("Stored quotes could not be read; starting from the default quotes.");
    }

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => commands::quote::show(&mut book, &output),
        Commands::Next { category } => commands::quote::next(&mut book, category, &output),
        Commands::Add { text, category } => {
            let remote = commands::quote::post_target(&config);
            let remote = remote.as_ref().map(|r| r as &dyn RemoteSource);
            commands::quote::add(&mut book, remote, text, category, &output).await
        }
        Commands::List { category } => commands::quote::list(&book, category, &output),
        Commands::Categories => commands::quote::categories(&book, &output),
        Commands::Filter { category } => commands::quote::filter(&mut book, category, &output),
        Commands::Export { output: target } => {
            commands::transfer::export(&book, target, &output)
        }
        Commands::Import { file } => commands::transfer::import(&mut book, file, &output),
        Commands::Clear { yes } => commands::quote::clear(&mut book, yes, &output),
        Commands::Sync => commands::sync::sync(book, &config, &output).await,
        Commands::Watch => commands::sync::watch(book, &config, &output).await,
        Commands::Status => commands::status::show(&book, &config, &output),
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

/// Initialize logging when QUOTH_LOG is set
///
/// Logs go to `log_file` when configured, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTH_LOG") else {
        return;
    };

    // The binary's own module paths start with `quoth`
    let env_filter = EnvFilter::new(format!("quoth_core={},quoth={}", log_level, log_level));

    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();

            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
