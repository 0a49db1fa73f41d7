use crate::error::{Result, ScanError};
use crate::fetcher::{Fetcher, Page, normalize_seed};
use crate::result::{CrawlSummary, DiscoveredLink};
use crate::scope::CrawlScope;
use crate::sink::LinkSink;
use crate::sitemap::{PreSeed, SitemapSeeder};
use crate::visited::VisitedSet;
use futures::stream::{FuturesUnordered, StreamExt};
use scraper::{Html, Selector};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub const DEFAULT_WORKERS: usize = 10;

pub struct Crawler {
    fetcher: Fetcher,
    deep: bool,
    workers: usize,
    max_depth: Option<usize>,
    max_links: Option<usize>,
    use_sitemap: bool,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::new()?))
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self::with_fetcher(Fetcher::with_timeout(timeout_secs)?))
    }

    pub fn with_fetcher(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            deep: false,
            workers: DEFAULT_WORKERS,
            max_depth: None,
            max_links: None,
            use_sitemap: true,
            progress_callback: None,
        }
    }

    pub fn with_deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_links(mut self, links: Option<usize>) -> Self {
        self.max_links = links;
        self
    }

    pub fn with_sitemap(mut self, use_sitemap: bool) -> Self {
        self.use_sitemap = use_sitemap;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from `seed`, writing every newly discovered in-scope URL to `sink`.
    ///
    /// Only a failed seed fetch or a sink write error is returned as `Err`;
    /// every other fetch failure drops that branch and is counted in the summary.
    pub async fn crawl<S: LinkSink>(&self, seed: &str, sink: &mut S) -> Result<CrawlSummary> {
        let started = Instant::now();
        let seed_url = normalize_seed(seed)?;
        let scope = CrawlScope::from_seed(&seed_url)?;

        info!(
            "Starting crawl of {} (scope {}, deep: {}, workers: {})",
            seed_url,
            scope.host(),
            self.deep,
            self.workers
        );

        let summary = CrawlSummary::new(seed_url.to_string(), scope.host().to_string(), self.deep);
        let mut run = CrawlRun {
            scope,
            visited: VisitedSet::new(),
            preseed: PreSeed::default(),
            pending: VecDeque::new(),
            summary,
            deep: self.deep,
            max_depth: self.max_depth,
            max_links: self.max_links,
        };
        run.visited.mark_and_check(seed_url.as_str());

        self.report_progress(seed_url.as_str());
        let seed_page = self
            .fetcher
            .fetch(seed_url.as_str())
            .await
            .map_err(|e| ScanError::SeedUnreachable {
                url: seed_url.to_string(),
                source: Box::new(e),
            })?;
        run.summary.pages_fetched += 1;
        sink.start()?;

        if self.use_sitemap {
            run.preseed = SitemapSeeder::new(self.fetcher.clone())
                .seed_from_page(&seed_page)
                .await;
            run.summary.sitemap_url = run.preseed.sitemap_url.clone();
            run.summary.sitemap_entries = run.preseed.urls.len();
        }

        let seed_hrefs = page_hrefs(&seed_page);
        run.process_page(&seed_page.url, seed_hrefs, 0, sink)?;

        let mut in_flight = FuturesUnordered::new();
        loop {
            while !run.summary.truncated
                && in_flight.len() < self.workers
                && let Some((url, depth)) = run.pending.pop_front()
            {
                self.report_progress(&url);
                let fetcher = &self.fetcher;
                in_flight.push(async move {
                    let outcome = fetcher.fetch(&url).await.map(|page| page_hrefs(&page));
                    (url, depth, outcome)
                });
            }

            let Some((url, depth, outcome)) = in_flight.next().await else {
                break;
            };

            match outcome {
                Ok(hrefs) => {
                    run.summary.pages_fetched += 1;
                    run.process_page(&url, hrefs, depth, sink)?;
                }
                Err(e) => {
                    run.summary.pages_failed += 1;
                    warn!("Skipping {}: {}", url, e);
                }
            }

            if run.summary.truncated {
                debug!("Link cap reached, abandoning {} fetches", in_flight.len());
                break;
            }
        }

        run.summary.elapsed = started.elapsed();
        info!(
            "Crawl complete. Fetched {} pages, emitted {} links ({} fetches failed)",
            run.summary.pages_fetched, run.summary.links_emitted, run.summary.pages_failed
        );
        Ok(run.summary)
    }

    fn report_progress(&self, url: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(url);
        }
    }
}

/// State owned by a single crawl run.
struct CrawlRun {
    scope: CrawlScope,
    visited: VisitedSet,
    preseed: PreSeed,
    pending: VecDeque<(String, usize)>,
    summary: CrawlSummary,
    deep: bool,
    max_depth: Option<usize>,
    max_links: Option<usize>,
}

impl CrawlRun {
    /// Filter, dedup and emit the hrefs found on `source`, queueing follow-ups.
    fn process_page<S: LinkSink>(
        &mut self,
        source: &str,
        hrefs: Vec<String>,
        depth: usize,
        sink: &mut S,
    ) -> Result<()> {
        let Ok(page_url) = Url::parse(source) else {
            warn!("Cannot resolve links against {}", source);
            return Ok(());
        };
        let follow = self.deep && self.max_depth.is_none_or(|max| depth < max);

        for href in hrefs {
            let Some(url) = self.scope.admit(&href, &page_url) else {
                continue;
            };

            if self.preseed.contains(&url) {
                // Known from the sitemap: never emitted, still crawlable.
                if follow && self.visited.mark_and_check(&url) {
                    self.pending.push_back((url, depth + 1));
                }
                continue;
            }

            if self.cap_reached() {
                self.summary.truncated = true;
                return Ok(());
            }

            if !self.visited.mark_and_check(&url) {
                continue;
            }

            let link = DiscoveredLink {
                url,
                source: source.to_string(),
            };
            sink.emit(&link)?;
            self.summary.links_emitted += 1;
            debug!("Discovered {} on {}", link.url, link.source);

            if follow {
                self.pending.push_back((link.url, depth + 1));
            }

            if self.cap_reached() {
                self.summary.truncated = true;
                return Ok(());
            }
        }

        Ok(())
    }

    fn cap_reached(&self) -> bool {
        self.max_links.is_some_and(|max| self.summary.links_emitted >= max)
    }
}

/// Anchors of an HTML page. Other content types yield nothing.
fn page_hrefs(page: &Page) -> Vec<String> {
    if !page.is_html() {
        debug!("Not parsing {} ({:?})", page.url, page.content_type);
        return Vec::new();
    }
    extract_hrefs(&page.body)
}

/// Raw `href` values of every anchor in `html`, in document order.
fn extract_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
