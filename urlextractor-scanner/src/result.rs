use serde::Serialize;
use std::time::Duration;

/// A link that survived filtering, with the page it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredLink {
    pub url: String,
    pub source: String,
}

/// Counters for one finished crawl run.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub scope: String,
    pub deep: bool,
    pub sitemap_url: Option<String>,
    pub sitemap_entries: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub links_emitted: usize,
    pub truncated: bool,
    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn new(seed: String, scope: String, deep: bool) -> Self {
        Self {
            seed,
            scope,
            deep,
            sitemap_url: None,
            sitemap_entries: 0,
            pages_fetched: 0,
            pages_failed: 0,
            links_emitted: 0,
            truncated: false,
            elapsed: Duration::from_secs(0),
        }
    }
}
