//! Data models for quoth
//!
//! Defines the core data structures: `Quote` and `CategoryFilter`.
//! A quote has no identifier; two quotes are the same quote when both
//! their text and category match exactly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Category name that selects every quote
pub const ALL_CATEGORIES: &str = "all";

/// Validation errors for quote input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// A required field was empty after trimming
    #[error("Please fill in both fields: {field} is empty")]
    EmptyField { field: &'static str },
}

/// A quote with its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Quote {
    /// The quote itself
    pub text: String,
    /// Free-form category name
    pub category: String,
}

impl Quote {
    /// Create a quote from user input
    ///
    /// Both fields are trimmed and must be non-empty afterwards.
    pub fn new(text: impl AsRef<str>, category: impl AsRef<str>) -> Result<Self, QuoteError> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();

        if text.is_empty() {
            return Err(QuoteError::EmptyField { field: "text" });
        }
        if category.is_empty() {
            return Err(QuoteError::EmptyField { field: "category" });
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Build a quote from an untyped JSON value
    ///
    /// Returns `None` unless the value is an object whose `text` and
    /// `category` are both strings. Strings are taken as-is.
    pub fn from_json(value: &Value) -> Option<Self> {
        let text = value.get("text")?.as_str()?;
        let category = value.get("category")?.as_str()?;
        Some(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" — {}", self.text, self.category)
    }
}

/// The quotes every fresh store starts with
pub fn default_quotes() -> Vec<Quote> {
    [
        (
            "The best way to predict the future is to create it.",
            "Motivation",
        ),
        ("In the middle of difficulty lies opportunity.", "Inspiration"),
        ("Happiness depends upon ourselves.", "Philosophy"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

/// Category selection for random picks and listings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No restriction
    #[default]
    All,
    /// Only quotes whose category equals this value
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied category name
    ///
    /// `"all"` (and an empty string) mean no restriction.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(name.to_string())
        }
    }

    /// Check whether a quote passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }

    /// The name persisted for this filter
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(name) => name,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_new_trims() {
        let quote = Quote::new("  Carpe diem ", "\tLatin\n").unwrap();
        assert_eq!(quote.text, "Carpe diem");
        assert_eq!(quote.category, "Latin");
    }

    #[test]
    fn test_quote_new_rejects_blank_fields() {
        assert_eq!(
            Quote::new("   ", "Latin"),
            Err(QuoteError::EmptyField { field: "text" })
        );
        assert_eq!(
            Quote::new("Carpe diem", ""),
            Err(QuoteError::EmptyField { field: "category" })
        );
    }

    #[test]
    fn test_from_json_shape_check() {
        assert!(Quote::from_json(&json!({"text": "a", "category": "b"})).is_some());
        assert!(Quote::from_json(&json!({"text": "a"})).is_none());
        assert!(Quote::from_json(&json!({"text": 1, "category": "b"})).is_none());
        assert!(Quote::from_json(&json!({"text": "a", "category": null})).is_none());
        assert!(Quote::from_json(&json!("a string")).is_none());
        assert!(Quote::from_json(&Value::Null).is_none());
    }

    #[test]
    fn test_default_quotes() {
        let defaults = default_quotes();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[0].category, "Motivation");
        assert_eq!(defaults[2].text, "Happiness depends upon ourselves.");
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Latin "),
            CategoryFilter::Category("Latin".to_string())
        );
        assert_eq!(CategoryFilter::parse("Latin").as_str(), "Latin");
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn test_category_filter_matches() {
        let quote = Quote::new("Carpe diem", "Latin").unwrap();
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::parse("Latin").matches(&quote));
        assert!(!CategoryFilter::parse("latin").matches(&quote));
    }

    #[test]
    fn test_quote_serialization_shape() {
        let quote = Quote::new("Carpe diem", "Latin").unwrap();
        let value = serde_json::to_value(&quote).unwrap();
        assert_eq!(value, json!({"text": "Carpe diem", "category": "Latin"}));
    }
}
