//! Quote command handlers

use anyhow::{Context, Result};
use tracing::warn;

use quoth_core::sync::{HttpRemote, RemoteSource};
use quoth_core::{CategoryFilter, Config, OsRandom, QuoteBook};

use crate::output::Output;
use crate::prompt::confirm;

/// Show the session's quote, picking one if none was shown yet
pub fn show(book: &mut QuoteBook, output: &Output) -> Result<()> {
    let shown = book.show_initial(&mut OsRandom);
    output.print_shown(shown.as_ref());
    Ok(())
}

/// Show a different random quote
///
/// With `--category`, the choice is also remembered for later calls.
pub fn next(book: &mut QuoteBook, category: Option<String>, output: &Output) -> Result<()> {
    let filter = match category {
        Some(name) => {
            let filter = CategoryFilter::parse(&name);
            let saved = book.select_category(&filter);
            if let Some(ref e) = saved.save_error {
                output.warn_not_saved(e);
            }
            filter
        }
        None => book.selected_category(),
    };

    let shown = book.show_random_in(&filter, &mut OsRandom);
    if shown.is_none() && !book.is_empty() {
        output.message(&format!("No quotes in category '{}'.", filter));
        return Ok(());
    }

    output.print_shown(shown.as_ref());
    Ok(())
}

/// The server new quotes are posted to, when sync is enabled
///
/// A client that cannot be built only costs the post, so it is logged
/// and skipped.
pub fn post_target(config: &Config) -> Option<HttpRemote> {
    if !config.sync_enabled {
        return None;
    }

    match HttpRemote::new(config.sync_url.as_str()) {
        Ok(remote) => Some(remote),
        Err(e) => {
            warn!("Not posting new quotes to {}: {:#}", config.sync_url, e);
            None
        }
    }
}

/// Add a quote, then show it
///
/// With a `remote`, the stored quote is also posted to the server.
pub async fn add(
    book: &mut QuoteBook,
    remote: Option<&dyn RemoteSource>,
    text: String,
    category: String,
    output: &Output,
) -> Result<()> {
    let saved = book
        .add(&text, &category)
        .context("Quote was not added")?;

    if let Some(ref e) = saved.save_error {
        output.warn_not_saved(e);
    }

    let shown = book.show(saved.value);

    if let (Some(remote), Some(shown)) = (remote, shown.as_ref()) {
        remote.post_quote(&shown.quote).await;
    }

    if output.is_quiet() {
        println!("{}", saved.value);
        return Ok(());
    }

    if saved.is_persisted() {
        output.success("Quote added and saved.");
    } else {
        output.success("Quote added.");
    }
    output.print_shown(shown.as_ref());

    Ok(())
}

/// List quotes, optionally restricted to one category
pub fn list(book: &QuoteBook, category: Option<String>, output: &Output) -> Result<()> {
    let filter = category
        .map(|name| CategoryFilter::parse(&name))
        .unwrap_or_default();

    let quotes: Vec<_> = book
        .quotes()
        .iter()
        .enumerate()
        .filter(|(_, quote)| filter.matches(quote))
        .collect();

    output.print_quotes(&quotes);
    Ok(())
}

/// List categories with their quote counts
pub fn categories(book: &QuoteBook, output: &Output) -> Result<()> {
    let counts = category_counts(book);
    output.print_categories(&counts, &book.selected_category());
    Ok(())
}

/// Remember the category used by `next`
pub fn filter(book: &mut QuoteBook, category: String, output: &Output) -> Result<()> {
    let filter = CategoryFilter::parse(&category);

    if let CategoryFilter::Category(ref name) = filter {
        if !book.categories().contains(name) {
            output.warning(&format!("No quotes in category '{}' yet.", name));
        }
    }

    let saved = book.select_category(&filter);
    if let Some(ref e) = saved.save_error {
        output.warn_not_saved(e);
    }

    output.success(&format!("Showing category: {}", filter));
    Ok(())
}

/// Remove every quote
pub fn clear(book: &mut QuoteBook, yes: bool, output: &Output) -> Result<()> {
    if book.is_empty() {
        output.message("No quotes to clear.");
        return Ok(());
    }

    if !yes && output.should_prompt() {
        println!("This removes all {} quote(s).", book.len());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = book.len();
    let saved = book.clear();
    if let Some(ref e) = saved.save_error {
        output.warn_not_saved(e);
    }

    output.success(&format!("Cleared {} quote(s).", removed));
    Ok(())
}

/// Count quotes per category, in first-seen order
fn category_counts(book: &QuoteBook) -> Vec<(String, usize)> {
    book.categories()
        .into_iter()
        .map(|name| {
            let count = book.quotes().iter().filter(|q| q.category == name).count();
            (name, count)
        })
        .collect()
}
