use crate::output::{OutputFile, default_output_path};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;
use url::Url;
use urlextractor_scanner::crawler::DEFAULT_WORKERS;
use urlextractor_scanner::fetcher::DEFAULT_TIMEOUT_SECS;
use urlextractor_scanner::{CrawlSummary, Crawler, DiscoveredLink, LinkSink};

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub url: String,
    pub output: PathBuf,
    pub deep: bool,
    pub threads: usize,
    pub timeout_secs: u64,
    pub max_depth: Option<usize>,
    pub max_links: Option<usize>,
    pub use_sitemap: bool,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    /// Shallow crawl of `url` into the default output file.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let output = default_output_path(&url);
        Self {
            url,
            output,
            deep: false,
            threads: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_depth: None,
            max_links: None,
            use_sitemap: true,
            show_progress_bars: false,
        }
    }
}

/// Callback for each link as it is written to the output file
pub type LinkCallback = Arc<dyn Fn(&DiscoveredLink) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Output file plus whatever the front end wants to see per link.
struct ReportingSink {
    file: OutputFile,
    link_callback: Option<LinkCallback>,
    progress_bar: Option<Arc<ProgressBar>>,
}

impl LinkSink for ReportingSink {
    fn start(&mut self) -> std::io::Result<()> {
        self.file.start()
    }

    fn emit(&mut self, link: &DiscoveredLink) -> std::io::Result<()> {
        self.file.emit(link)?;
        if let Some(ref callback) = self.link_callback {
            match self.progress_bar {
                Some(ref pb) => pb.suspend(|| callback(link)),
                None => callback(link),
            }
        }
        Ok(())
    }
}

/// Execute a crawl with the given options
/// Returns the crawl summary once the output file holds every discovered URL
pub async fn execute_crawl(
    options: CrawlOptions,
    link_callback: Option<LinkCallback>,
) -> Result<CrawlSummary> {
    let CrawlOptions {
        url,
        output,
        deep,
        threads,
        timeout_secs,
        max_depth,
        max_links,
        use_sitemap,
        show_progress_bars,
    } = options;

    // Set up single spinner for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.yellow} {msg}")
                .context("invalid spinner template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting extraction...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetched_count = Arc::new(AtomicUsize::new(0));

    let mut crawler = Crawler::with_timeout(timeout_secs)
        .context("failed to build HTTP client")?
        .with_deep(deep)
        .with_workers(threads)
        .with_max_depth(max_depth)
        .with_max_links(max_links)
        .with_sitemap(use_sitemap);

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        let count_clone = fetched_count.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |url: &str| {
            let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
            pb_clone.set_message(format!(
                "Extracting... {} pages fetched  {}",
                count,
                extract_url_path(url)
            ));
        }));
    }

    debug!("Writing discovered URLs to {}", output.display());
    let mut sink = ReportingSink {
        file: OutputFile::new(&output),
        link_callback,
        progress_bar: progress_bar.clone(),
    };

    let outcome = crawler.crawl(&url, &mut sink).await;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    outcome.with_context(|| format!("crawl of {} failed", url))
}

/// Generate a plain-text report from a crawl summary
pub fn generate_crawl_report(summary: &CrawlSummary, output: &Path) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", summary.seed));
    report.push_str(&format!("  Scope: {} (and subdomains)\n", summary.scope));
    report.push_str(&format!(
        "  Mode: {}\n",
        if summary.deep { "deep" } else { "seed page only" }
    ));

    match summary.sitemap_url {
        Some(ref sitemap) => report.push_str(&format!(
            "  Sitemap: {} ({} entries)\n",
            sitemap, summary.sitemap_entries
        )),
        None => report.push_str("  Sitemap: none\n"),
    }

    report.push_str(&format!("  Pages fetched: {}\n", summary.pages_fetched));
    report.push_str(&format!("  Failed fetches: {}\n", summary.pages_failed));
    report.push_str(&format!("  URLs discovered: {}\n", summary.links_emitted));
    if summary.truncated {
        report.push_str("  Stopped early: link cap reached\n");
    }
    report.push_str(&format!(
        "  Elapsed: {:.2}s\n",
        summary.elapsed.as_secs_f64()
    ));
    report.push_str(&format!("  Output: {}\n", output.display()));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report
}

pub fn summary_json(summary: &CrawlSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize crawl summary")
}
