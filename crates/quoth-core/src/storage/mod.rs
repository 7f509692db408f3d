//! Storage layer
//!
//! Quotes are kept in string slots of a key-value store:
//!
//! - **Durable** slots survive restarts (one file per key under `data_dir`)
//! - **Session** slots live in the runtime directory and vanish with it
//!
//! `QuotePersistence` maps quote state onto those slots.

mod backend;
mod error;
mod persistence;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{StorageError, StorageResult};
pub use persistence::{LoadOutcome, QuotePersistence, CATEGORY_KEY, LAST_INDEX_KEY, QUOTES_KEY};
