//! Two-tier page cache.
//!
//! The transient tier is an in-memory map from cache key to decoded page and
//! serves every read. The durable tier ([`FileStore`]) is write-through: it is
//! enumerated into memory once by [`PageCache::open`] and afterwards only
//! written to. Entries are never evicted; a key is overwritten when a fresher
//! page is loaded for it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::store::FileStore;
use crate::{Error, Page, Result};

/// In-memory page map backed by an optional durable store.
#[derive(Debug)]
pub struct PageCache {
    entries: RwLock<HashMap<String, Arc<Page>>>,
    store: Option<FileStore>,
}

impl PageCache {
    /// Open a cache over `store`, loading every durable entry into memory.
    ///
    /// Must complete before the first query so that offline pages are visible.
    pub async fn open(store: FileStore) -> Result<Self> {
        let loader = store.clone();
        let stored = tokio::task::spawn_blocking(move || loader.load_all())
            .await
            .map_err(|e| Error::Storage(format!("Cache load task failed: {e}")))??;

        let entries: HashMap<String, Arc<Page>> = stored
            .into_iter()
            .map(|entry| (entry.key, Arc::new(entry.page)))
            .collect();

        info!(
            "Loaded {} cached pages from {}",
            entries.len(),
            store.root().display()
        );

        Ok(Self {
            entries: RwLock::new(entries),
            store: Some(store),
        })
    }

    /// A cache without a durable tier.
    #[must_use]
    pub fn ephemeral() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Whether writes are persisted across processes.
    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Look up a page in the transient tier.
    pub async fn get(&self, key: &str) -> Option<Arc<Page>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Store a page in both tiers and return the shared handle.
    ///
    /// A failed durable write is logged; the transient tier is updated regardless.
    pub async fn put(&self, key: &str, page: Page) -> Arc<Page> {
        let page = Arc::new(page);
        self.entries
            .write()
            .await
            .insert(key.to_string(), Arc::clone(&page));

        if let Some(store) = &self.store {
            let store = store.clone();
            let owned_key = key.to_string();
            let persisted = Arc::clone(&page);
            let result =
                tokio::task::spawn_blocking(move || store.put(&owned_key, &persisted)).await;

            match result {
                Ok(Ok(())) => debug!("Persisted page {}", key),
                Ok(Err(e)) => warn!("Failed to persist page {}: {}", key, e),
                Err(e) => warn!("Persist task for {} failed: {}", key, e),
            }
        }

        page
    }

    /// Number of cached pages.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no pages.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Cached keys in sorted order.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop every entry from both tiers.
    pub async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();

        if let Some(store) = &self.store {
            let store = store.clone();
            tokio::task::spawn_blocking(move || store.clear())
                .await
                .map_err(|e| Error::Storage(format!("Cache clear task failed: {e}")))??;
        }
        Ok(())
    }
}
