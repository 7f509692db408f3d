//! In-memory quote store
//!
//! `QuoteStore` owns the ordered list of quotes and implements the pure
//! data operations on it: add, batch import, remote merge, filtering.
//! It knows nothing about persistence; see `QuoteBook` for the facade
//! that saves after every mutation.

use std::collections::HashSet;

use serde_json::Value;

use crate::models::{default_quotes, CategoryFilter, Quote, QuoteError};

/// Ordered collection of quotes
///
/// Insertion order is preserved. Plain `add` does not deduplicate;
/// only `import_batch` does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

/// How an import batch turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// At least one quote was appended
    Added(usize),
    /// Every valid candidate was already present
    DuplicatesOnly,
    /// No candidate had string `text` and `category`
    NoneValid,
}

/// Counts from an import batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Quotes appended to the store
    pub added: usize,
    /// Valid candidates skipped because their pair key already existed
    pub duplicates: usize,
    /// Candidates that failed the shape check
    pub invalid: usize,
}

impl ImportReport {
    pub fn outcome(&self) -> ImportOutcome {
        if self.added > 0 {
            ImportOutcome::Added(self.added)
        } else if self.duplicates > 0 {
            ImportOutcome::DuplicatesOnly
        } else {
            ImportOutcome::NoneValid
        }
    }
}

/// Counts from merging remote quotes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote quotes appended as new entries
    pub added: usize,
    /// Local entries whose category was overwritten by the remote one
    pub updated: usize,
}

impl MergeReport {
    /// Total entries touched
    pub fn changed(&self) -> usize {
        self.added + self.updated
    }
}

impl QuoteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the default quotes
    pub fn with_defaults() -> Self {
        Self::from_quotes(default_quotes())
    }

    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    /// Replace the whole contents (used after a successful load)
    pub fn replace_all(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
    }

    /// Remove every quote
    pub fn clear(&mut self) {
        self.quotes.clear();
    }

    /// Add a quote from user input
    ///
    /// Returns the index of the new quote. Blank fields leave the store
    /// untouched.
    pub fn add(&mut self, text: &str, category: &str) -> Result<usize, QuoteError> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote);
        Ok(self.quotes.len() - 1)
    }

    /// Append every candidate that is well-formed and not already present
    pub fn import_batch(&mut self, candidates: &[Value]) -> ImportReport {
        let mut report = ImportReport::default();
        let mut existing: HashSet<Quote> = self.quotes.iter().cloned().collect();

        for candidate in candidates {
            let Some(quote) = Quote::from_json(candidate) else {
                report.invalid += 1;
                continue;
            };

            if existing.insert(quote.clone()) {
                self.quotes.push(quote);
                report.added += 1;
            } else {
                report.duplicates += 1;
            }
        }

        report
    }

    /// Merge quotes fetched from the remote endpoint
    ///
    /// Matching is by exact text. The remote category always wins; an
    /// entry whose category already agrees is left alone and not counted.
    pub fn merge_remote(&mut self, remote: Vec<Quote>) -> MergeReport {
        let mut report = MergeReport::default();

        for incoming in remote {
            match self.quotes.iter_mut().find(|q| q.text == incoming.text) {
                Some(local) if local.category != incoming.category => {
                    local.category = incoming.category;
                    report.updated += 1;
                }
                Some(_) => {}
                None => {
                    self.quotes.push(incoming);
                    report.added += 1;
                }
            }
        }

        report
    }

    /// Indices of the quotes passing `filter`, in store order
    pub fn filtered_indices(&self, filter: &CategoryFilter) -> Vec<usize> {
        self.quotes
            .iter()
            .enumerate()
            .filter(|(_, q)| filter.matches(q))
            .map(|(i, _)| i)
            .collect()
    }

    /// Quotes passing `filter`, in store order
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.quotes
            .iter()
            .filter(|q| seen.insert(q.category.as_str()))
            .map(|q| q.category.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn test_with_defaults() {
        let store = QuoteStore::with_defaults();
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_add_appends() {
        let mut store = QuoteStore::with_defaults();
        let index = store.add("Carpe diem", "Latin").unwrap();
        assert_eq!(index, 3);
        assert_eq!(store.get(3), Some(&quote("Carpe diem", "Latin")));
    }

    #[test]
    fn test_add_blank_never_mutates() {
        let mut store = QuoteStore::with_defaults();
        let before = store.clone();

        assert!(store.add("", "Latin").is_err());
        assert!(store.add("Carpe diem", "   ").is_err());
        assert!(store.add(" \t", "\n").is_err());

        assert_eq!(store, before);
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let mut store = QuoteStore::new();
        store.add("Carpe diem", "Latin").unwrap();
        store.add("Carpe diem", "Latin").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_skips_existing() {
        let mut store = QuoteStore::with_defaults();
        let candidates: Vec<Value> = store
            .quotes()
            .iter()
            .map(|q| serde_json::to_value(q).unwrap())
            .collect();

        let report = store.import_batch(&candidates);
        assert_eq!(report.added, 0);
        assert_eq!(report.duplicates, 3);
        assert_eq!(report.outcome(), ImportOutcome::DuplicatesOnly);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_import_disjoint_grows_by_exact_count() {
        let mut store = QuoteStore::with_defaults();
        let candidates = vec![
            json!({"text": "Carpe diem", "category": "Latin"}),
            json!({"text": "Veni, vidi, vici", "category": "Latin"}),
        ];

        let report = store.import_batch(&candidates);
        assert_eq!(report.outcome(), ImportOutcome::Added(2));
        assert_eq!(store.len(), 5);
        assert_eq!(store.get(4).unwrap().text, "Veni, vidi, vici");
    }

    #[test]
    fn test_import_counts_invalid_items() {
        let mut store = QuoteStore::new();
        let candidates = vec![
            json!({"text": "ok", "category": "fine"}),
            json!({"text": "no category"}),
            json!({"text": 42, "category": "numbers"}),
            json!(null),
        ];

        let report = store.import_batch(&candidates);
        assert_eq!(report.added, 1);
        assert_eq!(report.invalid, 3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_import_none_valid() {
        let mut store = QuoteStore::with_defaults();
        let report = store.import_batch(&[json!({"quote": "x"}), json!(7)]);
        assert_eq!(report.outcome(), ImportOutcome::NoneValid);
        assert_eq!(store.len(), 3);

        let report = store.import_batch(&[]);
        assert_eq!(report.outcome(), ImportOutcome::NoneValid);
    }

    #[test]
    fn test_import_dedups_within_batch() {
        let mut store = QuoteStore::new();
        let item = json!({"text": "Carpe diem", "category": "Latin"});
        let report = store.import_batch(&[item.clone(), item]);
        assert_eq!(report.added, 1);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_import_same_text_other_category_is_new() {
        let mut store = QuoteStore::from_quotes(vec![quote("Carpe diem", "Latin")]);
        let report = store.import_batch(&[json!({"text": "Carpe diem", "category": "Motto"})]);
        assert_eq!(report.added, 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_compares_fields_not_joined_text() {
        let mut store = QuoteStore::from_quotes(vec![quote("a|||b", "c")]);
        let report = store.import_batch(&[json!({"text": "a", "category": "b|||c"})]);
        assert_eq!(report.added, 1);
        assert_eq!(report.duplicates, 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_merge_overwrites_and_appends() {
        let mut store = QuoteStore::from_quotes(vec![quote("A", "X")]);

        let report = store.merge_remote(vec![quote("A", "Y"), quote("B", "Z")]);

        assert_eq!(report.changed(), 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.added, 1);
        assert_eq!(store.quotes(), &[quote("A", "Y"), quote("B", "Z")]);
        assert!(store.quotes().iter().all(|q| q.category != "X"));
    }

    #[test]
    fn test_merge_identical_is_not_a_change() {
        let mut store = QuoteStore::from_quotes(vec![quote("A", "X")]);
        let report = store.merge_remote(vec![quote("A", "X")]);
        assert_eq!(report.changed(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_touches_first_text_match_only() {
        let mut store = QuoteStore::from_quotes(vec![quote("A", "X"), quote("A", "W")]);
        store.merge_remote(vec![quote("A", "Y")]);
        assert_eq!(store.quotes(), &[quote("A", "Y"), quote("A", "W")]);
    }

    #[test]
    fn test_filtered() {
        let mut store = QuoteStore::with_defaults();
        store.add("Carpe diem", "Latin").unwrap();
        store.add("Alea iacta est", "Latin").unwrap();

        let latin = CategoryFilter::parse("Latin");
        assert_eq!(store.filtered_indices(&latin), vec![3, 4]);
        assert_eq!(store.filtered(&latin).len(), 2);
        assert_eq!(store.filtered(&CategoryFilter::All).len(), 5);
        assert!(store
            .filtered_indices(&CategoryFilter::parse("Nope"))
            .is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let mut store = QuoteStore::with_defaults();
        store.add("Carpe diem", "Latin").unwrap();
        store.add("Seize the day", "Motivation").unwrap();

        assert_eq!(
            store.categories(),
            vec!["Motivation", "Inspiration", "Philosophy", "Latin"]
        );
    }

    #[test]
    fn test_clear_and_replace() {
        let mut store = QuoteStore::with_defaults();
        store.clear();
        assert!(store.is_empty());

        store.replace_all(vec![quote("A", "X")]);
        assert_eq!(store.len(), 1);
    }
}
