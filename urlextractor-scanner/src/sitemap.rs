// Sitemap discovery and parsing used to pre-seed a crawl

use crate::error::{Result, ScanError};
use crate::fetcher::{Fetcher, Page};
use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// URLs known from the sitemap before traversal starts.
#[derive(Debug, Clone, Default)]
pub struct PreSeed {
    pub sitemap_url: Option<String>,
    pub urls: HashSet<String>,
}

impl PreSeed {
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }
}

#[derive(Debug, Clone)]
pub struct SitemapSeeder {
    fetcher: Fetcher,
}

impl SitemapSeeder {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch the seed page and look for a `<link rel="sitemap">`.
    /// Fetch failures mean "no sitemap".
    pub async fn discover_sitemap(&self, seed_url: &str) -> Option<String> {
        let seed = Url::parse(seed_url).ok()?;
        match self.fetcher.fetch(seed.as_str()).await {
            Ok(page) => sitemap_link(&page.body, &seed).map(|u| u.to_string()),
            Err(e) => {
                debug!("Sitemap discovery fetch of {} failed: {}", seed_url, e);
                None
            }
        }
    }

    /// Fetch and parse a sitemap. Any failure yields an empty set.
    pub async fn load_sitemap(&self, sitemap_url: &str) -> HashSet<String> {
        let page = match self.fetcher.fetch(sitemap_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not fetch sitemap {}: {}", sitemap_url, e);
                return HashSet::new();
            }
        };

        match parse_sitemap(page.body.as_bytes()) {
            Ok(urls) => {
                info!("Loaded {} entries from sitemap {}", urls.len(), sitemap_url);
                urls.into_iter().collect()
            }
            Err(e) => {
                warn!("Ignoring sitemap {}: {}", sitemap_url, e);
                HashSet::new()
            }
        }
    }

    /// Discovery against an already fetched seed page, followed by loading.
    pub async fn seed_from_page(&self, page: &Page) -> PreSeed {
        let sitemap_url = Url::parse(&page.url)
            .ok()
            .and_then(|base| sitemap_link(&page.body, &base));

        let Some(sitemap_url) = sitemap_url else {
            debug!("No sitemap link on {}", page.url);
            return PreSeed::default();
        };

        let urls = self.load_sitemap(sitemap_url.as_str()).await;
        PreSeed {
            sitemap_url: Some(sitemap_url.to_string()),
            urls,
        }
    }
}

/// Find a `<link rel="sitemap" href=...>` in `html`, resolved against `base`.
pub fn sitemap_link(html: &str, base: &Url) -> Option<Url> {
    let selector = Selector::parse(r#"link[rel~="sitemap"][href]"#).ok()?;
    let document = Html::parse_document(html);
    let href = document
        .select(&selector)
        .find_map(|element| element.value().attr("href"))?;
    base.join(href.trim()).ok()
}

/// Extract every `<loc>` entry of a `urlset` or `sitemapindex` document.
pub fn parse_sitemap(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut locs = Vec::new();
    let mut current: Option<String> = None;
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if depth == 0 {
                    if name.as_ref() != b"urlset" && name.as_ref() != b"sitemapindex" {
                        return Err(ScanError::Parse(format!(
                            "unexpected root element <{}>",
                            String::from_utf8_lossy(name.as_ref())
                        )));
                    }
                    saw_root = true;
                }
                if name.as_ref() == b"loc" {
                    current = Some(String::new());
                }
                depth += 1;
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"loc"
                    && let Some(loc) = current.take()
                {
                    let loc = loc.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(t)) => {
                if let Some(ref mut loc) = current {
                    let text = t
                        .unescape()
                        .map_err(|e| ScanError::Parse(e.to_string()))?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(ref mut loc) = current {
                    loc.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ScanError::Parse(format!(
                    "XML error at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ScanError::Parse("document has no sitemap root".to_string()));
    }
    if depth != 0 {
        return Err(ScanError::Parse("unexpected end of document".to_string()));
    }

    Ok(locs)
}
