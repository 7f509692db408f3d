//! Status command handler

use anyhow::Result;

use quoth_core::{Config, LoadStatus, QuoteBook};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(book: &QuoteBook, config: &Config, output: &Output) -> Result<()> {
    let selected = book.selected_category();
    let last_shown = book.last_shown().map(|shown| shown.index);
    let category_count = book.categories().len();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "storage": {
                        "data_dir": config.data_dir,
                        "session_dir": config.session_path(),
                        "loaded_from": load_source(book.load_status()),
                    },
                    "counts": {
                        "quotes": book.len(),
                        "categories": category_count,
                    },
                    "selected_category": selected.as_str(),
                    "last_shown": last_shown,
                    "sync": {
                        "enabled": config.sync_enabled,
                        "url": config.sync_url,
                        "interval_secs": config.sync_interval_secs,
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", book.len());
        }
        OutputFormat::Human => {
            println!("quoth Status");
            println!("============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Session:  {}", config.session_path().display());
            println!("  Loaded:   {}", describe_load(book.load_status()));
            println!();
            println!("Contents:");
            println!("  Quotes:     {}", book.len());
            println!("  Categories: {}", category_count);
            println!("  Selected:   {}", selected);
            if let Some(index) = last_shown {
                println!("  Last shown: #{}", index);
            }
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Server:   {}", config.sync_url);
            println!("  Interval: {}s", config.sync_interval_secs);
        }
    }

    Ok(())
}

fn load_source(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Defaults => "defaults",
        LoadStatus::Rejected => "defaults (stored data unreadable)",
        LoadStatus::Loaded { .. } => "storage",
    }
}

fn describe_load(status: LoadStatus) -> String {
    match status {
        LoadStatus::Loaded { kept, dropped: 0 } => format!("{} quote(s) from storage", kept),
        LoadStatus::Loaded { kept, dropped } => format!(
            "{} quote(s) from storage, {} malformed entr{} skipped",
            kept,
            dropped,
            if dropped == 1 { "y" } else { "ies" }
        ),
        other => load_source(other).to_string(),
    }
}
