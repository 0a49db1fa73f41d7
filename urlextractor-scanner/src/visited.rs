use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// URLs already fetched or emitted during one crawl run.
///
/// Every visit decision goes through [`VisitedSet::mark_and_check`], so a URL
/// is handled at most once even when several fetches complete concurrently.
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `url` if absent. Returns true iff it was newly inserted.
    pub fn mark_and_check(&self, url: &str) -> bool {
        let mut visited = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if visited.contains(url) {
            false
        } else {
            visited.insert(url.to_string())
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_mark_and_check_first_insert_wins() {
        let visited = VisitedSet::new();
        assert!(visited.is_empty());

        assert!(visited.mark_and_check("http://example.com/a"));
        assert!(!visited.mark_and_check("http://example.com/a"));
        assert!(visited.contains("http://example.com/a"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_no_normalization() {
        let visited = VisitedSet::new();
        assert!(visited.mark_and_check("http://example.com/a"));
        assert!(visited.mark_and_check("http://example.com/a/"));
        assert!(visited.mark_and_check("http://example.com/a?x=1&y=2"));
        assert!(visited.mark_and_check("http://example.com/a?y=2&x=1"));
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn test_concurrent_mark_and_check() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let visited = visited.clone();
                let winners = winners.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        if visited.mark_and_check(&format!("http://example.com/{}", i)) {
                            winners.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::Relaxed), 100);
        assert_eq!(visited.len(), 100);
    }
}
