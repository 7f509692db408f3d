//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use quoth_core::{CategoryFilter, Quote, ShownQuote, StorageError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Whether interactive prompts are allowed
    pub fn should_prompt(&self) -> bool {
        matches!(self.format, OutputFormat::Human)
    }

    /// Print a shown quote, or the empty-collection hint
    pub fn print_shown(&self, shown: Option<&ShownQuote>) {
        match (self.format, shown) {
            (OutputFormat::Human, Some(shown)) => {
                println!("\"{}\"", shown.quote.text);
                println!("  — {}", shown.quote.category);
            }
            (OutputFormat::Human, None) => {
                println!("No quotes available. Add one with `quoth add <TEXT> <CATEGORY>`.");
            }
            (OutputFormat::Json, Some(shown)) => {
                println!(
                    "{}",
                    serde_json::json!({
                        "index": shown.index,
                        "text": shown.quote.text,
                        "category": shown.quote.category,
                    })
                );
            }
            (OutputFormat::Json, None) => println!("null"),
            (OutputFormat::Quiet, Some(shown)) => println!("{}", shown.quote.text),
            (OutputFormat::Quiet, None) => {}
        }
    }

    /// Print quotes with their positions
    pub fn print_quotes(&self, quotes: &[(usize, &Quote)]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for (index, quote) in quotes {
                    println!(
                        "{:>4} | {} | {}",
                        index,
                        truncate(&quote.category, 16),
                        truncate(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                let items: Vec<_> = quotes.iter().map(|(_, q)| q).collect();
                println!("{}", to_pretty_json(&items));
            }
            OutputFormat::Quiet => {
                for (_, quote) in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print categories, marking the selected one
    pub fn print_categories(&self, categories: &[(String, usize)], selected: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                let marker = |name: &str| if selected.as_str() == name { "*" } else { " " };
                println!("{} all", marker(quoth_core::ALL_CATEGORIES));
                for (name, count) in categories {
                    println!("{} {} ({})", marker(name.as_str()), name, count);
                }
            }
            OutputFormat::Json => {
                let items: Vec<_> = categories
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!(
                    "{}",
                    to_pretty_json(&serde_json::json!({
                        "selected": selected.as_str(),
                        "categories": items,
                    }))
                );
            }
            OutputFormat::Quiet => {
                for (name, _) in categories {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a non-fatal warning to stderr (shown even in quiet mode)
    pub fn warning(&self, msg: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!("{}", serde_json::json!({"status": "warning", "message": msg}));
            }
            _ => eprintln!("⚠ {}", msg),
        }
    }

    /// Warn that a change lives only in memory
    pub fn warn_not_saved(&self, error: &StorageError) {
        let mut msg = format!("Could not save quotes: {}", error);
        if let Some(hint) = error.recovery_suggestion() {
            msg.push(' ');
            msg.push_str(hint);
        }
        self.warning(&msg);
    }
}

fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
