//! Resolution of page references to pages.
//!
//! The loader is a staleness-aware memoization layer: a cached page is reused
//! while its own `lastChanged` is not older than the one carried by the
//! reference, otherwise the page is fetched again and both cache tiers are
//! updated. Freshness is driven by the reference, never by fetch time.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::cache::PageCache;
use crate::{Page, PageRef, Result};

/// Something that can produce a decoded page for a URL.
///
/// [`crate::Fetcher`] is the network/filesystem implementation.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve and decode the page at `url`.
    async fn fetch_page(&self, url: &Url) -> Result<Page>;
}

/// Resolves [`PageRef`]s through the [`PageCache`], fetching on miss or staleness.
pub struct PageLoader {
    source: Arc<dyn PageSource>,
    cache: Arc<PageCache>,
    base: Url,
}

impl PageLoader {
    /// Create a loader. Relative page paths are resolved against `base`.
    pub fn new(source: Arc<dyn PageSource>, cache: Arc<PageCache>, base: Url) -> Self {
        Self {
            source,
            cache,
            base,
        }
    }

    /// URL that relative page paths are resolved against.
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// The cache this loader reads and populates.
    pub const fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }

    /// Absolute URL for a page path; this is also the page's cache key.
    pub fn locate(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    /// Resolve a reference to its page.
    ///
    /// A reference without a path yields `Ok(None)` without any I/O.
    pub async fn resolve(&self, reference: &PageRef) -> Result<Option<Arc<Page>>> {
        let Some(path) = reference.path() else {
            return Ok(None);
        };
        let url = self.locate(path)?;

        if let Some(cached) = self.cache.get(url.as_str()).await {
            if reference.accepts(cached.last_changed) {
                debug!("Cache hit for {}", url);
                return Ok(Some(cached));
            }
            debug!(
                "Cached {} is stale ({} < {:?})",
                url, cached.last_changed, reference.last_changed
            );
        } else {
            debug!("Cache miss for {}", url);
        }

        self.load(&url).await.map(Some)
    }

    /// Fetch `url` unconditionally and store the result in the cache.
    pub async fn load(&self, url: &Url) -> Result<Arc<Page>> {
        let page = self.source.fetch_page(url).await?;
        Ok(self.cache.put(url.as_str(), page).await)
    }
}
