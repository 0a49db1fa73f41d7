use crate::error::{Result, ScanError};
use url::Url;

/// True when `candidate_host` is `scope_host` or one of its subdomains.
pub fn in_scope(candidate_host: &str, scope_host: &str) -> bool {
    candidate_host == scope_host || candidate_host.ends_with(&format!(".{}", scope_host))
}

/// The host a crawl is confined to, fixed from the seed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
}

impl CrawlScope {
    pub fn from_seed(seed: &Url) -> Result<Self> {
        let host = seed
            .host_str()
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", seed)))?;
        Ok(Self {
            host: host.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Filter one raw href found on `page`. Returns the resolved absolute URL
    /// when the link may be emitted.
    ///
    /// Hrefs carrying a fragment are dropped whole, even if the part before
    /// `#` would be a valid page.
    pub fn admit(&self, href: &str, page: &Url) -> Option<String> {
        if href.contains('#') {
            return None;
        }

        let resolved = page.join(href.trim()).ok()?;
        let host = resolved.host_str()?;
        if !in_scope(host, &self.host) {
            return None;
        }

        Some(resolved.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(seed: &str) -> CrawlScope {
        CrawlScope::from_seed(&Url::parse(seed).unwrap()).unwrap()
    }

    #[test]
    fn test_in_scope_same_host() {
        assert!(in_scope("example.com", "example.com"));
    }

    #[test]
    fn test_in_scope_subdomain() {
        assert!(in_scope("blog.example.com", "example.com"));
        assert!(in_scope("a.b.example.com", "example.com"));
    }

    #[test]
    fn test_in_scope_rejects_lookalikes() {
        assert!(!in_scope("notexample.com", "example.com"));
        assert!(!in_scope("example.com.evil.net", "example.com"));
        assert!(!in_scope("other.com", "example.com"));
    }

    #[test]
    fn test_in_scope_parent_of_scope_is_out() {
        assert!(!in_scope("example.com", "www.example.com"));
    }

    #[test]
    fn test_admit_relative_link() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://example.com/docs/index.html").unwrap();

        assert_eq!(
            scope.admit("/a", &page),
            Some("http://example.com/a".to_string())
        );
        assert_eq!(
            scope.admit("intro.html", &page),
            Some("http://example.com/docs/intro.html".to_string())
        );
    }

    #[test]
    fn test_admit_rejects_fragments() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://example.com/").unwrap();

        assert_eq!(scope.admit("/b#section", &page), None);
        assert_eq!(scope.admit("#top", &page), None);
        assert_eq!(scope.admit("http://example.com/c#x", &page), None);
    }

    #[test]
    fn test_admit_rejects_hostless_schemes() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://example.com/").unwrap();

        assert_eq!(scope.admit("mailto:someone@example.com", &page), None);
        assert_eq!(scope.admit("javascript:void(0)", &page), None);
        assert_eq!(scope.admit("tel:+15555555555", &page), None);
    }

    #[test]
    fn test_admit_other_host() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://example.com/").unwrap();

        assert_eq!(scope.admit("https://other.com/x", &page), None);
        assert_eq!(
            scope.admit("https://shop.example.com/cart", &page),
            Some("https://shop.example.com/cart".to_string())
        );
    }

    #[test]
    fn test_admit_scope_is_seed_host_not_page_host() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://blog.example.com/post").unwrap();

        assert_eq!(
            scope.admit("/next", &page),
            Some("http://blog.example.com/next".to_string())
        );
        assert_eq!(scope.admit("http://www.other.org/", &page), None);
    }

    #[test]
    fn test_admit_keeps_query_verbatim() {
        let scope = scope("http://example.com/");
        let page = Url::parse("http://example.com/").unwrap();

        assert_eq!(
            scope.admit("/search?b=2&a=1", &page),
            Some("http://example.com/search?b=2&a=1".to_string())
        );
    }

    #[test]
    fn test_from_seed_lowercases_host() {
        let scope = scope("http://Example.COM/");
        assert_eq!(scope.host(), "example.com");
    }
}
