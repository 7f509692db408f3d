//! Quote persistence
//!
//! Maps the quote collection onto two slot stores:
//!
//! - durable: the quote list (JSON array) and the selected category
//! - session: the index of the last shown quote, gone when the session ends
//!
//! Saves report their errors so callers can warn the user. Loads never
//! fail: anything unreadable falls back to "no data".

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::backend::{FileStore, KeyValueStore, MemoryStore};
use super::error::{StorageError, StorageResult};
use crate::config::Config;
use crate::models::{CategoryFilter, Quote};

/// Durable slot holding the quote list
pub const QUOTES_KEY: &str = "dynamicQuoteGenerator.quotes";

/// Durable slot holding the selected category filter
pub const CATEGORY_KEY: &str = "dynamicQuoteGenerator.selectedCategory";

/// Session slot holding the last shown index
pub const LAST_INDEX_KEY: &str = "dynamicQuoteGenerator.lastShownIndex";

/// Result of reading the durable quote slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot was never written
    NoData,
    /// Slot exists but is unreadable or not a JSON array
    Rejected { reason: String },
    /// Slot held an array; malformed elements were dropped
    Loaded { quotes: Vec<Quote>, dropped: usize },
}

/// Reads and writes quote state through slot stores
pub struct QuotePersistence {
    durable: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl QuotePersistence {
    pub fn new(durable: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// File-backed persistence at the configured locations
    pub fn open(config: &Config) -> Self {
        Self::open_at(config.data_dir.clone(), config.session_path())
    }

    /// File-backed persistence rooted at explicit directories
    pub fn open_at(data_dir: PathBuf, session_dir: PathBuf) -> Self {
        Self::new(
            Box::new(FileStore::new(data_dir)),
            Box::new(FileStore::new(session_dir)),
        )
    }

    /// Memory-only persistence (nothing survives the process)
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    /// Write the full quote list to the durable slot
    pub fn save_quotes(&mut self, quotes: &[Quote]) -> StorageResult<()> {
        let json = serde_json::to_string(quotes).map_err(|source| StorageError::Serialize {
            key: QUOTES_KEY.to_string(),
            source,
        })?;
        self.durable.set(QUOTES_KEY, &json)?;
        debug!("Saved {} quotes", quotes.len());
        Ok(())
    }

    /// Read the quote list from the durable slot
    pub fn load_quotes(&self) -> LoadOutcome {
        let raw = match self.durable.get(QUOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::NoData,
            Err(e) => {
                warn!("Failed to read stored quotes: {}", e);
                return LoadOutcome::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!("Stored quotes are not a JSON array; keeping defaults");
                return LoadOutcome::Rejected {
                    reason: "stored value is not a JSON array".to_string(),
                };
            }
            Err(e) => {
                warn!("Stored quotes are not valid JSON: {}", e);
                return LoadOutcome::Rejected {
                    reason: e.to_string(),
                };
            }
        };

        let total = items.len();
        let quotes: Vec<Quote> = items.iter().filter_map(Quote::from_json).collect();
        let dropped = total - quotes.len();
        if dropped > 0 {
            info!("Dropped {} malformed stored quote(s)", dropped);
        }

        LoadOutcome::Loaded { quotes, dropped }
    }

    /// Write the selected category to the durable slot
    pub fn save_category(&mut self, filter: &CategoryFilter) -> StorageResult<()> {
        self.durable.set(CATEGORY_KEY, filter.as_str())
    }

    /// Read the selected category; unreadable or missing means "all"
    pub fn load_category(&self) -> CategoryFilter {
        match self.durable.get(CATEGORY_KEY) {
            Ok(Some(name)) => CategoryFilter::parse(&name),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                debug!("Ignoring unreadable category slot: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Remember the last shown index for this session; errors are ignored
    pub fn save_last_index(&mut self, index: usize) {
        if let Err(e) = self.session.set(LAST_INDEX_KEY, &index.to_string()) {
            debug!("Ignoring session slot write failure: {}", e);
        }
    }

    /// Last shown index for this session, if any was recorded
    ///
    /// Callers still need to bounds-check it against the current store.
    pub fn load_last_index(&self) -> Option<usize> {
        match self.session.get(LAST_INDEX_KEY) {
            Ok(Some(raw)) => raw.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Ignoring session slot read failure: {}", e);
                None
            }
        }
    }

    /// Forget the session's last shown index
    pub fn clear_last_index(&mut self) {
        if let Err(e) = self.session.remove(LAST_INDEX_KEY) {
            debug!("Ignoring session slot remove failure: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_quotes;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().join("data"),
            session_dir: temp_dir.path().join("run"),
            ..Config::default()
        }
    }

    fn durable_with(raw: &str) -> QuotePersistence {
        let mut durable = MemoryStore::new();
        durable.set(QUOTES_KEY, raw).unwrap();
        QuotePersistence::new(Box::new(durable), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_save_and_load_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let mut persistence = QuotePersistence::open(&config);
        assert_eq!(persistence.load_quotes(), LoadOutcome::NoData);

        persistence.save_quotes(&default_quotes()).unwrap();

        let reopened = QuotePersistence::open(&config);
        assert_eq!(
            reopened.load_quotes(),
            LoadOutcome::Loaded {
                quotes: default_quotes(),
                dropped: 0
            }
        );
        assert!(config.data_dir.join(QUOTES_KEY).exists());
    }

    #[test]
    fn test_load_rejects_non_array() {
        let persistence = durable_with(r#"{"text": "a", "category": "b"}"#);
        assert!(matches!(
            persistence.load_quotes(),
            LoadOutcome::Rejected { .. }
        ));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let persistence = durable_with("[{not json");
        assert!(matches!(
            persistence.load_quotes(),
            LoadOutcome::Rejected { .. }
        ));
    }

    #[test]
    fn test_load_drops_malformed_elements() {
        let persistence = durable_with(
            r#"[{"text": "a", "category": "b"}, {"text": "c"}, 5, {"text": "d", "category": "e"}]"#,
        );

        match persistence.load_quotes() {
            LoadOutcome::Loaded { quotes, dropped } => {
                assert_eq!(quotes.len(), 2);
                assert_eq!(dropped, 2);
                assert_eq!(quotes[1].text, "d");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_save_reports_quota_error() {
        let mut persistence = QuotePersistence::new(
            Box::new(MemoryStore::with_quota(40)),
            Box::new(MemoryStore::new()),
        );

        let err = persistence.save_quotes(&default_quotes()).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(persistence.load_quotes(), LoadOutcome::NoData);
    }

    #[test]
    fn test_save_reports_unwritable_directory() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where the data directory should be
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();

        let mut persistence = QuotePersistence::new(
            Box::new(FileStore::new(blocker.join("data"))),
            Box::new(MemoryStore::new()),
        );
        assert!(persistence.save_quotes(&default_quotes()).is_err());
    }

    #[test]
    fn test_category_roundtrip() {
        let mut persistence = QuotePersistence::in_memory();
        assert_eq!(persistence.load_category(), CategoryFilter::All);

        persistence
            .save_category(&CategoryFilter::parse("Latin"))
            .unwrap();
        assert_eq!(
            persistence.load_category(),
            CategoryFilter::Category("Latin".to_string())
        );

        persistence.save_category(&CategoryFilter::All).unwrap();
        assert_eq!(persistence.load_category(), CategoryFilter::All);
    }

    #[test]
    fn test_last_index_roundtrip() {
        let mut persistence = QuotePersistence::in_memory();
        assert_eq!(persistence.load_last_index(), None);

        persistence.save_last_index(2);
        assert_eq!(persistence.load_last_index(), Some(2));

        persistence.clear_last_index();
        assert_eq!(persistence.load_last_index(), None);
    }

    #[test]
    fn test_last_index_garbage_is_absent() {
        let mut session = MemoryStore::new();
        session.set(LAST_INDEX_KEY, "-1").unwrap();
        let persistence = QuotePersistence::new(Box::new(MemoryStore::new()), Box::new(session));
        assert_eq!(persistence.load_last_index(), None);
    }

    #[test]
    fn test_session_slot_is_separate_from_durable() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let session_dir = temp_dir.path().join("run").join("session-1");

        let mut persistence = QuotePersistence::open_at(data_dir.clone(), session_dir.clone());
        persistence.save_last_index(1);

        assert!(session_dir.join(LAST_INDEX_KEY).exists());
        assert!(!data_dir.join(LAST_INDEX_KEY).exists());
    }

    #[test]
    fn test_session_write_failure_is_swallowed() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();

        let mut persistence = QuotePersistence::new(
            Box::new(MemoryStore::new()),
            Box::new(FileStore::new(blocker.join("session"))),
        );
        persistence.save_last_index(3);
        assert_eq!(persistence.load_last_index(), None);
    }
}
