//! Quote book: the store plus its persistence
//!
//! `QuoteBook` is the main entry point. It seeds the default quotes,
//! replaces them with whatever durable storage holds, and saves after
//! every mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut book = QuoteBook::open()?;
//!
//! let saved = book.add("Carpe diem", "Latin")?;
//! if let Some(e) = saved.save_error {
//!     eprintln!("not saved: {}", e);
//! }
//!
//! let shown = book.show_random(&mut OsRandom);
//! ```
//!
//! A failed save never rolls back the in-memory change; the book stays
//! authoritative for the rest of the process.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{CategoryFilter, Quote, QuoteError};
use crate::picker::{pick_random, pick_random_filtered, RandomSource};
use crate::storage::{LoadOutcome, QuotePersistence, StorageError};
use crate::store::{ImportReport, MergeReport, QuoteStore};
use crate::transfer::{export_quotes, parse_import, ExportDocument, TransferError};

/// Outcome of a mutation and whether it reached durable storage
#[derive(Debug)]
pub struct Saved<T> {
    /// What the mutation produced
    pub value: T,
    /// Set when the follow-up save failed
    pub save_error: Option<StorageError>,
}

impl<T> Saved<T> {
    fn new(value: T, save_error: Option<StorageError>) -> Self {
        Self { value, save_error }
    }

    /// Check if the change was written to durable storage
    pub fn is_persisted(&self) -> bool {
        self.save_error.is_none()
    }
}

/// How the book was populated at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing stored yet; defaults in use
    Defaults,
    /// Stored data was unusable; defaults in use
    Rejected,
    /// Stored quotes replaced the defaults
    Loaded { kept: usize, dropped: usize },
}

/// A quote picked for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownQuote {
    /// Position in the book
    pub index: usize,
    pub quote: Quote,
}

/// The quote collection with persistence
pub struct QuoteBook {
    store: QuoteStore,
    persistence: QuotePersistence,
    load_status: LoadStatus,
}

impl QuoteBook {
    /// Open the book at the configured location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(&config))
    }

    /// Open the book with a specific configuration
    pub fn open_with_config(config: &Config) -> Self {
        Self::with_persistence(QuotePersistence::open(config))
    }

    /// Seed defaults, then load whatever `persistence` holds
    pub fn with_persistence(persistence: QuotePersistence) -> Self {
        let mut store = QuoteStore::with_defaults();

        let load_status = match persistence.load_quotes() {
            LoadOutcome::NoData => {
                info!("No stored quotes; using defaults");
                LoadStatus::Defaults
            }
            LoadOutcome::Rejected { reason } => {
                warn!("Ignoring stored quotes ({}); using defaults", reason);
                LoadStatus::Rejected
            }
            LoadOutcome::Loaded { quotes, dropped } => {
                let kept = quotes.len();
                store.replace_all(quotes);
                info!("Loaded {} stored quotes", kept);
                LoadStatus::Loaded { kept, dropped }
            }
        };

        Self {
            store,
            persistence,
            load_status,
        }
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn quotes(&self) -> &[Quote] {
        self.store.quotes()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // ==================== Mutations ====================

    /// Add a quote from user input and save
    ///
    /// Returns the new quote's index. Blank fields are rejected before
    /// anything changes.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Saved<usize>, QuoteError> {
        let index = self.store.add(text, category)?;
        Ok(Saved::new(index, self.persist()))
    }

    /// Import an export document
    ///
    /// Fails without changes unless `body` is a JSON array. Saves only
    /// when something was added.
    pub fn import_json(&mut self, body: &str) -> Result<Saved<ImportReport>, TransferError> {
        let items = parse_import(body)?;
        Ok(self.import_items(&items))
    }

    /// Import already-parsed candidates
    pub fn import_items(&mut self, items: &[Value]) -> Saved<ImportReport> {
        let report = self.store.import_batch(items);
        info!(
            "Imported {} quote(s), {} duplicate(s), {} invalid",
            report.added, report.duplicates, report.invalid
        );

        let save_error = if report.added > 0 {
            self.persist()
        } else {
            None
        };
        Saved::new(report, save_error)
    }

    /// Merge remote quotes (remote category wins) and save if anything changed
    pub fn merge_remote(&mut self, remote: Vec<Quote>) -> Saved<MergeReport> {
        let report = self.store.merge_remote(remote);

        let save_error = if report.changed() > 0 {
            info!(
                "Merged remote quotes: {} added, {} updated",
                report.added, report.updated
            );
            self.persist()
        } else {
            None
        };
        Saved::new(report, save_error)
    }

    /// Remove every quote and save the empty list
    pub fn clear(&mut self) -> Saved<()> {
        self.store.clear();
        self.persistence.clear_last_index();
        Saved::new((), self.persist())
    }

    /// Write the current list to durable storage
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.persistence.save_quotes(self.store.quotes())
    }

    fn persist(&mut self) -> Option<StorageError> {
        match self.save() {
            Ok(()) => None,
            Err(e) => {
                warn!("Failed to save quotes: {}", e);
                Some(e)
            }
        }
    }

    // ==================== Export ====================

    /// Render the whole book as an export document stamped with `now`
    pub fn export(&self, now: DateTime<Utc>) -> Result<ExportDocument, TransferError> {
        export_quotes(self.store.quotes(), now)
    }

    // ==================== Display ====================

    /// Show the quote at `index` and remember it for this session
    pub fn show(&mut self, index: usize) -> Option<ShownQuote> {
        let quote = self.store.get(index)?.clone();
        self.persistence.save_last_index(index);
        Some(ShownQuote { index, quote })
    }

    /// The quote last shown in this session, if still in range
    pub fn last_shown(&self) -> Option<ShownQuote> {
        let index = self.persistence.load_last_index()?;
        let quote = self.store.get(index)?.clone();
        Some(ShownQuote { index, quote })
    }

    /// Show a random quote other than the last one shown
    pub fn show_random(&mut self, rng: &mut impl RandomSource) -> Option<ShownQuote> {
        let exclude = self.valid_last_index();
        let index = pick_random(&self.store, exclude, rng)?;
        self.show(index)
    }

    /// Show a random quote from `filter`, other than the last one shown
    pub fn show_random_in(
        &mut self,
        filter: &CategoryFilter,
        rng: &mut impl RandomSource,
    ) -> Option<ShownQuote> {
        let exclude = self.valid_last_index();
        let index = pick_random_filtered(&self.store, filter, exclude, rng)?;
        self.show(index)
    }

    /// Restore the session's last quote, or pick a fresh one
    pub fn show_initial(&mut self, rng: &mut impl RandomSource) -> Option<ShownQuote> {
        match self.last_shown() {
            Some(shown) => Some(shown),
            None => self.show_random(rng),
        }
    }

    fn valid_last_index(&self) -> Option<usize> {
        self.persistence
            .load_last_index()
            .filter(|&i| i < self.store.len())
    }

    // ==================== Categories ====================

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    /// The remembered category filter
    pub fn selected_category(&self) -> CategoryFilter {
        self.persistence.load_category()
    }

    /// Remember a category filter across restarts
    pub fn select_category(&mut self, filter: &CategoryFilter) -> Saved<()> {
        let save_error = self.persistence.save_category(filter).err();
        if let Some(ref e) = save_error {
            warn!("Failed to save selected category: {}", e);
        }
        Saved::new((), save_error)
    }
}
