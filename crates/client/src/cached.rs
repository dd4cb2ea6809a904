//! Cache-and-count wrapper around a page fetcher.
//!
//! [`CachedFetcher`] composes a [`PageFetcher`] with a [`KeyValueStore`]:
//! fetched pages are cached under a TTL, and each real fetch attempt bumps a
//! per-URL access counter. The exact per-call sequence is fixed:
//!
//! 1. `get("cached:" + url)` — on a hit, return immediately. No fetch, no
//!    count, no writes.
//! 2. On a miss: `increment("count:" + url)`, then fetch, then
//!    `set("cached:" + url, content, ttl)`.
//!
//! The counter tracks attempted fetches, not logical accesses: a cache hit
//! never increments it, and a failed fetch leaves the increment in place.
//! The check-increment-fetch-write sequence is not atomic as a whole, so two
//! concurrent misses for the same URL can both fetch and both count;
//! last write wins on the cache entry.

use std::time::Duration;

use fetchcache_core::{Error, KeyValueStore};

use crate::fetch::PageFetcher;

/// Default cache entry time-to-live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// Cache key for a URL's page content.
pub fn cache_key(url: &str) -> String {
    format!("cached:{url}")
}

/// Counter key for a URL's fetch attempts.
pub fn count_key(url: &str) -> String {
    format!("count:{url}")
}

/// Fetcher with caching and access counting.
///
/// Stateless apart from the injected collaborators; safe to share behind
/// an `Arc` or construct per call site.
pub struct CachedFetcher<F, S> {
    fetcher: F,
    store: S,
    ttl: Duration,
}

impl<F, S> CachedFetcher<F, S>
where
    F: PageFetcher,
    S: KeyValueStore,
{
    /// Create a cached fetcher with the default TTL.
    pub fn new(fetcher: F, store: S) -> Self {
        Self::with_ttl(fetcher, store, DEFAULT_TTL)
    }

    /// Create a cached fetcher with an explicit TTL.
    pub fn with_ttl(fetcher: F, store: S, ttl: Duration) -> Self {
        Self { fetcher, store, ttl }
    }

    /// The configured cache TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a page's content, serving from cache within the TTL.
    ///
    /// The URL is not validated; a malformed URL reaches the fetch
    /// collaborator unchanged and its error surfaces as-is. Fetch and store
    /// failures propagate to the caller without retry, and a failed fetch
    /// never populates the cache.
    pub async fn get_page(&self, url: &str) -> Result<String, Error> {
        if let Some(content) = self.store.get(&cache_key(url)).await? {
            tracing::debug!(url, "cache hit");
            return Ok(content);
        }

        // Increment before fetching so a failed attempt still counts.
        let count = self.store.increment(&count_key(url)).await?;
        tracing::debug!(url, count, "cache miss, fetching");

        let content = self.fetcher.fetch(url).await?;
        self.store.set(&cache_key(url), &content, Some(self.ttl)).await?;

        Ok(content)
    }

    /// Number of fetch attempts recorded for a URL. Returns 0 when the URL
    /// has never been fetched.
    pub async fn access_count(&self, url: &str) -> Result<i64, Error> {
        match self.store.get(&count_key(url)).await? {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::StoreValue(format!("{}: not an integer", count_key(url)))),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetchcache_core::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        body: String,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl StubFetcher {
        fn returning(body: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { body: body.to_string(), calls: calls.clone(), fail: false }, calls)
        }

        fn failing() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (Self { body: String::new(), calls: calls.clone(), fail: true }, calls)
        }
    }

    #[async_trait::async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::HttpError("network error: unreachable".to_string()));
            }
            Ok(self.body.clone())
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(cache_key("http://example.com"), "cached:http://example.com");
        assert_eq!(count_key("http://example.com"), "count:http://example.com");
    }

    #[tokio::test]
    async fn test_miss_populates_cache_and_counter() {
        let (stub, calls) = StubFetcher::returning("<html>A</html>");
        let store = MemoryStore::new();
        let fetcher = CachedFetcher::new(stub, store.clone());

        let page = fetcher.get_page("http://example.com").await.unwrap();
        assert_eq!(page, "<html>A</html>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            store.get("cached:http://example.com").await.unwrap(),
            Some("<html>A</html>".to_string())
        );
        assert_eq!(store.get("count:http://example.com").await.unwrap(), Some("1".to_string()));
    }

    #[tokio::test]
    async fn test_hit_skips_fetch_and_count() {
        let (stub, calls) = StubFetcher::returning("<html>A</html>");
        let store = MemoryStore::new();
        let fetcher = CachedFetcher::new(stub, store);

        let first = fetcher.get_page("http://example.com").await.unwrap();
        let second = fetcher.get_page("http://example.com").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.access_count("http://example.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_expiry() {
        let (stub, calls) = StubFetcher::returning("<html>A</html>");
        let store = MemoryStore::new();
        let fetcher = CachedFetcher::with_ttl(stub, store, Duration::from_millis(40));

        fetcher.get_page("http://example.com").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        let page = fetcher.get_page("http://example.com").await.unwrap();

        assert_eq!(page, "<html>A</html>");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(fetcher.access_count("http://example.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_counter_is_per_url() {
        let (stub, _) = StubFetcher::returning("<html>A</html>");
        let fetcher = CachedFetcher::new(stub, MemoryStore::new());

        fetcher.get_page("http://example.com/a").await.unwrap();
        fetcher.get_page("http://example.com/b").await.unwrap();
        fetcher.get_page("http://example.com/a").await.unwrap();

        assert_eq!(fetcher.access_count("http://example.com/a").await.unwrap(), 1);
        assert_eq!(fetcher.access_count("http://example.com/b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_propagates_without_caching() {
        let (stub, calls) = StubFetcher::failing();
        let store = MemoryStore::new();
        let fetcher = CachedFetcher::new(stub, store.clone());

        let result = fetcher.get_page("http://example.com").await;
        assert!(matches!(result, Err(Error::HttpError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // No cache entry, but the attempt still counted.
        assert_eq!(store.get("cached:http://example.com").await.unwrap(), None);
        assert_eq!(fetcher.access_count("http://example.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_access_count_unseen_url() {
        let (stub, _) = StubFetcher::returning("");
        let fetcher = CachedFetcher::new(stub, MemoryStore::new());
        assert_eq!(fetcher.access_count("http://never.example").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_default_ttl() {
        let (stub, _) = StubFetcher::returning("");
        let fetcher = CachedFetcher::new(stub, MemoryStore::new());
        assert_eq!(fetcher.ttl(), Duration::from_secs(10));
    }
}
