//! Export and import command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use quoth_core::{ImportOutcome, QuoteBook};

use crate::output::{Output, OutputFormat};

/// Export all quotes to a JSON file
pub fn export(book: &QuoteBook, target: Option<PathBuf>, output: &Output) -> Result<()> {
    let doc = book.export(Utc::now()).context("Failed to export quotes")?;
    let path = export_path(target.as_deref(), &doc.file_name);

    fs::write(&path, &doc.contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": path,
                    "count": book.len(),
                })
            );
        }
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => {
            output.success(&format!(
                "Exported {} quote(s) to {}",
                book.len(),
                path.display()
            ));
        }
    }

    Ok(())
}

/// Import quotes from a JSON file
pub fn import(book: &mut QuoteBook, file: PathBuf, output: &Output) -> Result<()> {
    let body = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let saved = book
        .import_json(&body)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    let report = saved.value;

    if let Some(ref e) = saved.save_error {
        output.warn_not_saved(e);
    }

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "added": report.added,
                "duplicates": report.duplicates,
                "invalid": report.invalid,
                "saved": saved.save_error.is_none(),
            })
        );
        return Ok(());
    }

    match report.outcome() {
        ImportOutcome::Added(count) => {
            output.success(&format!("Imported {} quote(s).", count));
        }
        ImportOutcome::DuplicatesOnly => {
            output.message("No new quotes were added (all duplicates).");
        }
        ImportOutcome::NoneValid => {
            output.warning("No valid quotes found in file.");
        }
    }

    if report.invalid > 0 && report.added + report.duplicates > 0 {
        output.message(&format!(
            "Skipped {} item(s) without a text and category.",
            report.invalid
        ));
    }

    Ok(())
}

/// Resolve where the export lands
///
/// A directory receives the generated file name; any other path is used
/// as given. Without a target the current directory is used.
fn export_path(target: Option<&Path>, file_name: &str) -> PathBuf {
    match target {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}
