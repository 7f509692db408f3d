//! quoth core library
//!
//! This crate provides the core functionality for quoth, a local-first
//! collection of quotes with JSON import/export and remote sync.
//!
//! # Quick Start
//!
//! ```text
//! let mut book = QuoteBook::open()?;
//!
//! // Add a quote
//! book.add("Carpe diem", "Latin")?;
//!
//! // Show something new
//! let shown = book.show_random(&mut OsRandom);
//! ```
//!
//! # Modules
//!
//! - `book`: Quote book with persistence (main entry point)
//! - `models`: Quote and category filter types
//! - `store`: In-memory quote store operations
//! - `picker`: Random selection
//! - `transfer`: JSON export and import
//! - `storage`: Key-value slots and quote persistence
//! - `sync`: Remote fetch, merge and periodic sync
//! - `config`: Application configuration

pub mod book;
pub mod config;
pub mod models;
pub mod picker;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use book::{LoadStatus, QuoteBook, Saved, ShownQuote};
pub use config::Config;
pub use models::{CategoryFilter, Quote, QuoteError, ALL_CATEGORIES};
pub use picker::{OsRandom, RandomSource};
pub use storage::{StorageError, StorageResult};
pub use store::{ImportOutcome, ImportReport, MergeReport, QuoteStore};
pub use transfer::{ExportDocument, TransferError};
