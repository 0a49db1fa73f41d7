use crate::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl Page {
    /// Pages without a content-type header are treated as HTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|ct| ct.contains("html"))
            .unwrap_or(true)
    }
}

/// Single-attempt HTTP GET with a per-request timeout. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("urlextractor/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` once. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.text().await?;

        Ok(Page {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Parse a seed URL, prepending `http://` when no scheme is given.
pub fn normalize_seed(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidUrl("empty URL".to_string()));
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    if url.host_str().is_none() {
        return Err(ScanError::InvalidUrl(format!("{}: no host", trimmed)));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[test]
    fn test_normalize_seed_adds_scheme() {
        let url = normalize_seed("example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn test_normalize_seed_keeps_https() {
        let url = normalize_seed("https://www.example.com/docs").unwrap();
        assert_eq!(url.as_str(), "https://www.example.com/docs");
    }

    #[test]
    fn test_normalize_seed_rejects_garbage() {
        assert!(normalize_seed("").is_err());
        assert!(normalize_seed("http://").is_err());
        assert!(normalize_seed("not a valid url!!!").is_err());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>hi</body></html>", "text/html; charset=utf-8"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let page = fetcher.fetch(&mock_server.uri()).await.unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(page.is_html());
        assert!(page.body.contains("hi"));
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = Fetcher::new().unwrap();
        let err = fetcher
            .fetch(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        let fetcher = Fetcher::with_timeout(2).unwrap();
        // Port 9 (discard) on localhost is closed in test environments.
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, ScanError::Transport(_)));
    }

    #[test]
    fn test_non_html_content_type() {
        let page = Page {
            url: "http://example.com/file.pdf".to_string(),
            status: 200,
            content_type: Some("application/pdf".to_string()),
            body: String::new(),
        };
        assert!(!page.is_html());
    }
}
