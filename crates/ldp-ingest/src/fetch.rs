//! Paginated API reader
//!
//! Fetches record batches from REST endpoints that return a `docs` array,
//! OpenLibrary-style. Page failures are logged and skipped so one bad page
//! never aborts a source; rate limiting is a fixed pause between requests.

use crate::error::Result;
use ldp_core::RawRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("ldp-ingest/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// JSON key holding the record array in API responses
const DOCS_KEY: &str = "docs";

/// HTTP reader for paginated JSON sources
pub struct ApiReader {
    client: Client,
    delay: Duration,
}

impl ApiReader {
    /// Create a reader with the given pause between page requests
    pub fn new(delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, delay })
    }

    /// Fetch up to `pages` pages from `url`.
    ///
    /// The page number is appended to the URL's existing query string. A
    /// failed request or unparseable body skips that page with a warning;
    /// if every page fails the result is simply empty.
    pub async fn fetch(&self, url: &str, pages: u32) -> Vec<RawRecord> {
        let mut records = Vec::new();

        for page in 1..=pages {
            let page_url = format!("{}&page={}", url, page);
            debug!(page, pages, "fetching page");

            match self.fetch_page(&page_url).await {
                Ok(mut page_records) => {
                    debug!(page, count = page_records.len(), "fetched page");
                    records.append(&mut page_records);
                },
                Err(error) => {
                    warn!(page, error = %error, "failed to fetch page, skipping");
                },
            }

            if page < pages && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        records
    }

    async fn fetch_page(&self, url: &str) -> Result<Vec<RawRecord>> {
        let body: serde_json::Value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let docs = body
            .get(DOCS_KEY)
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        Ok(docs
            .into_iter()
            .filter_map(|doc| doc.as_object().cloned())
            .map(normalize_keys)
            .collect())
    }
}

/// Normalize field names to lowercase snake_case so they match schema and
/// rule declarations regardless of the API's header conventions.
fn normalize_keys(record: RawRecord) -> RawRecord {
    record
        .into_iter()
        .map(|(key, value)| {
            let key = key.trim().to_lowercase().replace([' ', '-'], "_");
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_normalized_to_snake_case() {
        let record = json!({" First Publish-Year ": 1965, "title": "Dune"})
            .as_object()
            .unwrap()
            .clone();

        let normalized = normalize_keys(record);
        assert!(normalized.contains_key("first_publish_year"));
        assert!(normalized.contains_key("title"));
    }
}
