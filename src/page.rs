//! TTL-bounded cache for expensive external fetches.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::convert::{Convert, Integer, Utf8};
use crate::error::CacheError;
use crate::store::Store;
use crate::utils::build_key;

/// Default lifetime of a cached page.
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10);

/// Key holding the cached content for `resource`.
pub fn page_key(resource: &str) -> String {
    build_key(&"cache", &resource)
}

/// Key holding the miss counter for `resource`.
pub fn count_key(resource: &str) -> String {
    build_key(&"count", &resource)
}

/// The external capability whose results are cached.
///
/// Any `Fn(String) -> Future<Output = Result<String, CacheError>>` closure is
/// a fetcher, which keeps HTTP clients and test doubles outside this crate.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, resource: &str) -> Result<String, CacheError>;
}

#[async_trait]
impl<F, Fut> Fetch for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, CacheError>> + Send + 'static,
{
    async fn fetch(&self, resource: &str) -> Result<String, CacheError> {
        self(resource.to_string()).await
    }
}

/// Configuration for [`PageCache`].
#[derive(Debug, Clone)]
pub struct PageCacheConfig {
    /// How long fetched content stays cached.
    pub ttl: Duration,
}

impl Default for PageCacheConfig {
    fn default() -> Self {
        PageCacheConfig {
            ttl: DEFAULT_PAGE_TTL,
        }
    }
}

/// Memoizes fetched content per resource for a fixed TTL and counts misses.
///
/// Content lives at `cache:{resource}` and expires with the TTL. The miss
/// counter at `count:{resource}` never expires, so it accumulates across
/// cache lifetimes until the store is flushed.
///
/// # Example
/// ```ignore
/// let pages = PageCache::new(store, |url: String| async move {
///     http_get(&url).await.map_err(|e| CacheError::fetch(&url, e.to_string()))
/// }, PageCacheConfig::default());
///
/// let body = pages.get_page("http://example.com").await?;
/// ```
pub struct PageCache<F> {
    store: Arc<dyn Store>,
    fetcher: F,
    ttl: Duration,
}

impl<F: Fetch> PageCache<F> {
    /// Create a page cache over `store`.
    ///
    /// Unlike [`crate::Cache::new`], this does not flush the store.
    pub fn new(store: Arc<dyn Store>, fetcher: F, config: PageCacheConfig) -> Self {
        PageCache {
            store,
            fetcher,
            ttl: config.ttl,
        }
    }

    /// Return the content for `resource`, fetching it on a miss.
    ///
    /// Any present entry is a hit, including an empty one. On a miss the
    /// counter is incremented before the fetch, so failed fetches are counted
    /// too. Fetch failures are returned to the caller and nothing is cached.
    /// A cached entry that is not valid UTF-8 is a conversion error.
    pub async fn get_page(&self, resource: &str) -> Result<String, CacheError> {
        let cache_key = page_key(resource);

        if let Some(raw) = self.store.get(&cache_key).await? {
            tracing::trace!(resource, "page cache hit");
            return Utf8
                .convert(raw)
                .map_err(|message| CacheError::conversion(cache_key, message));
        }

        let misses = self.store.incr(&count_key(resource)).await?;
        tracing::debug!(resource, misses, "page cache miss, fetching");

        let content = self.fetcher.fetch(resource).await.inspect_err(|e| {
            tracing::warn!(resource, error = %e, "fetch failed, nothing cached");
        })?;

        self.store
            .set_with_expiry(&cache_key, content.clone().into_bytes(), self.ttl)
            .await?;
        Ok(content)
    }

    /// How many times `resource` had to be fetched.
    pub async fn miss_count(&self, resource: &str) -> Result<i64, CacheError> {
        let key = count_key(resource);
        let raw = self.store.get(&key).await?;
        match raw {
            Some(raw) => Integer
                .convert(raw)
                .map_err(|message| CacheError::conversion(key, message)),
            None => Ok(0),
        }
    }

    /// The configured content lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
