//! Remote quote endpoint
//!
//! The endpoint serves a JSON array of posts. Each post's `title`
//! becomes the quote text and its `body` the category.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::Quote;

/// Category given to remote posts without a body
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Request timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// A source of server-side quotes
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the remote list. Failures are logged and yield an empty list.
    async fn fetch_quotes(&self) -> Vec<Quote>;

    /// Publish a new quote. The response is not checked.
    async fn post_quote(&self, quote: &Quote);
}

/// Body sent when publishing a quote
#[derive(Debug, Serialize)]
struct RemotePost<'a> {
    title: &'a str,
    body: &'a str,
}

/// HTTP client for the remote endpoint
#[derive(Debug, Clone)]
pub struct HttpRemote {
    url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent(concat!("quoth/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?
            .error_for_status()?;

        let body: Value = response
            .json()
            .await
            .context("Remote response is not valid JSON")?;

        parse_remote_quotes(&body)
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn fetch_quotes(&self) -> Vec<Quote> {
        match self.try_fetch().await {
            Ok(quotes) => {
                debug!("Fetched {} remote quotes from {}", quotes.len(), self.url);
                quotes
            }
            Err(e) => {
                warn!("Remote fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn post_quote(&self, quote: &Quote) {
        let payload = RemotePost {
            title: &quote.text,
            body: &quote.category,
        };

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) => info!("Posted quote to server (status {})", response.status()),
            Err(e) => warn!("Failed to post quote to server: {}", e),
        }
    }
}

/// Map a remote response body onto quotes
///
/// The body must be an array. Items without a non-blank string `title`
/// are skipped; a missing, blank or non-string `body` becomes
/// `Uncategorized`.
pub fn parse_remote_quotes(body: &Value) -> Result<Vec<Quote>> {
    let Value::Array(items) = body else {
        bail!("Remote response is not a JSON array");
    };

    Ok(items.iter().filter_map(remote_item_to_quote).collect())
}

fn remote_item_to_quote(item: &Value) -> Option<Quote> {
    let text = item.get("title")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let category = item
        .get("body")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|body| !body.is_empty())
        .unwrap_or(UNCATEGORIZED);

    Some(Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
}
