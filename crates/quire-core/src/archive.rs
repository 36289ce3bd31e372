//! Chained query engine.
//!
//! An [`Archive`] answers article queries by walking the page chain from a
//! starting page (the head page unless one is given) towards older pages.
//! Each visited page is handed to the handler registered for that page's
//! format; the handler's answer decides whether the walk continues. Pages are
//! visited strictly in chain order, one at a time, and any failure aborts the
//! query without returning partial results.
//!
//! ```rust,no_run
//! use quire_core::{Archive, Config};
//!
//! # async fn demo() -> quire_core::Result<()> {
//! let archive = Archive::open(&Config::load()?).await?;
//!
//! for article in archive.get_latest(12, None).await? {
//!     println!("{} {}", article.date.date_string(), article.title);
//! }
//!
//! let tagged = archive.get_by_tags(&["rust".to_string()], None).await?;
//! println!("{} articles tagged rust", tagged.len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::PageCache;
use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::handler::PageHandler;
use crate::loader::{PageLoader, PageSource};
use crate::locator::Locator;
use crate::registry::HandlerRegistry;
use crate::store::FileStore;
use crate::{Adjacent, Article, DateRange, Error, Page, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// Query facade over a chain of article pages.
pub struct Archive {
    registry: HandlerRegistry,
    loader: PageLoader,
    head: RwLock<Arc<Page>>,
}

impl Archive {
    /// Open the archive described by `config`.
    ///
    /// Loads the durable cache (unless persistence is disabled) and fetches
    /// the head page before returning. When the head cannot be fetched, a
    /// cached copy of it is used instead.
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let head_url = config.head_url()?;
        let fetcher = Fetcher::from_config(&config.fetch)?;

        let cache = if config.cache.persist {
            PageCache::open(FileStore::new(&config.cache.root)).await?
        } else {
            PageCache::ephemeral()
        };

        Self::connect(Arc::new(fetcher), Arc::new(cache), head_url).await
    }

    /// Build an archive from its collaborators and fetch the head page at `head_url`.
    pub async fn connect(
        source: Arc<dyn PageSource>,
        cache: Arc<PageCache>,
        head_url: Url,
    ) -> Result<Self> {
        let loader = PageLoader::new(source, cache, head_url.clone());
        let head = load_head(&loader).await?;
        info!("Opened archive at {}", head_url);

        Ok(Self {
            registry: HandlerRegistry::with_builtin(),
            loader,
            head: RwLock::new(head),
        })
    }

    /// Build an archive around an already decoded head page.
    ///
    /// Predecessor paths are resolved against the loader's base URL.
    pub fn with_head(loader: PageLoader, head: Page) -> Self {
        Self {
            registry: HandlerRegistry::with_builtin(),
            loader,
            head: RwLock::new(Arc::new(head)),
        }
    }

    /// The current head page.
    pub async fn head(&self) -> Arc<Page> {
        Arc::clone(&*self.head.read().await)
    }

    /// Fetch the head page again and make it the default starting page.
    ///
    /// Falls back to the cached head when the fetch fails.
    pub async fn refresh_head(&self) -> Result<Arc<Page>> {
        let head = load_head(&self.loader).await?;
        *self.head.write().await = Arc::clone(&head);
        Ok(head)
    }

    /// The page loader used to follow predecessor links.
    pub const fn loader(&self) -> &PageLoader {
        &self.loader
    }

    /// The page cache shared with the loader.
    pub const fn cache(&self) -> &Arc<PageCache> {
        self.loader.cache()
    }

    /// The handler registry consulted for every visited page.
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Register a handler for a new page format (`"<format>@<version>"`).
    pub fn register_handler(
        &self,
        format_version: &str,
        handler: Arc<dyn PageHandler>,
    ) -> Result<()> {
        self.registry.register(format_version, handler)
    }

    /// First article with the given id, searching newest to oldest.
    pub async fn get_by_id(&self, id: &str, start: Option<Arc<Page>>) -> Result<Option<Article>> {
        let mut found = None;
        self.walk(start, |handler, page| {
            found = handler.find_by_id(page, id).cloned();
            if found.is_some() {
                Step::Stop
            } else {
                Step::Continue
            }
        })
        .await?;
        Ok(found)
    }

    /// First article with the given slug, searching newest to oldest.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        start: Option<Arc<Page>>,
    ) -> Result<Option<Article>> {
        let mut found = None;
        self.walk(start, |handler, page| {
            found = handler.find_by_slug(page, slug).cloned();
            if found.is_some() {
                Step::Stop
            } else {
                Step::Continue
            }
        })
        .await?;
        Ok(found)
    }

    /// The `count` most recent articles, newest first.
    ///
    /// Returns fewer when the chain runs out.
    pub async fn get_latest(&self, count: usize, start: Option<Arc<Page>>) -> Result<Vec<Article>> {
        let mut articles: Vec<Article> = Vec::with_capacity(count.min(64));
        self.walk(start, |handler, page| {
            let remaining = count.saturating_sub(articles.len());
            articles.extend(handler.latest(page, remaining).into_iter().cloned());
            if articles.len() >= count {
                Step::Stop
            } else {
                Step::Continue
            }
        })
        .await?;
        Ok(articles)
    }

    /// Every article dated within `[from, to]`, in chain order.
    ///
    /// Fails with [`Error::Validation`] if either bound is not a date or `from` is after `to`.
    pub async fn get_by_date(
        &self,
        from: &str,
        to: &str,
        start: Option<Arc<Page>>,
    ) -> Result<Vec<Article>> {
        let range = DateRange::parse(from, to)?;
        self.get_by_range(&range, start).await
    }

    /// Every article dated within `range`, in chain order.
    pub async fn get_by_range(
        &self,
        range: &DateRange,
        start: Option<Arc<Page>>,
    ) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        self.walk(start, |handler, page| {
            let scan = handler.by_date(page, range);
            articles.extend(scan.matches.into_iter().cloned());
            if scan.continue_older {
                Step::Continue
            } else {
                Step::Stop
            }
        })
        .await?;
        Ok(articles)
    }

    /// Every article carrying all of `tags`, across the whole chain.
    pub async fn get_by_tags(
        &self,
        tags: &[String],
        start: Option<Arc<Page>>,
    ) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        self.walk(start, |handler, page| {
            articles.extend(handler.by_tags(page, tags).into_iter().cloned());
            Step::Continue
        })
        .await?;
        Ok(articles)
    }

    /// Every article listing all of `authors`, across the whole chain.
    pub async fn get_by_authors(
        &self,
        authors: &[String],
        start: Option<Arc<Page>>,
    ) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        self.walk(start, |handler, page| {
            articles.extend(handler.by_authors(page, authors).into_iter().cloned());
            Step::Continue
        })
        .await?;
        Ok(articles)
    }

    /// The articles around `id`.
    ///
    /// `next` is the more recent neighbour on the same page only; an article
    /// at the top of its page has no `next`, even if a newer page exists.
    /// `previous` falls through to the newest article of the predecessor page
    /// when `id` is the last article of its page. An unknown id yields two
    /// empty neighbours.
    pub async fn get_adjacent(&self, id: &str, start: Option<Arc<Page>>) -> Result<Adjacent> {
        Ok(self.find_adjacent(id, start).await?.unwrap_or_default())
    }

    /// Like [`Archive::get_adjacent`], but `None` when no article has that id.
    pub async fn find_adjacent(
        &self,
        id: &str,
        start: Option<Arc<Page>>,
    ) -> Result<Option<Adjacent>> {
        let mut adjacent = Adjacent::default();
        let mut located = false;

        self.walk(start, |handler, page| {
            if located {
                adjacent.previous = handler.newest(page).cloned();
                return Step::Stop;
            }

            let Some(neighbours) = handler.neighbours(page, id) else {
                return Step::Continue;
            };
            located = true;
            adjacent.next = neighbours.next.cloned();
            match neighbours.previous {
                Some(previous) => {
                    adjacent.previous = Some(previous.clone());
                    Step::Stop
                },
                None => Step::Continue,
            }
        })
        .await?;

        Ok(located.then_some(adjacent))
    }

    /// Look up the article a route points at.
    ///
    /// The root route points at no article.
    pub async fn locate(&self, route: &str) -> Result<Option<Article>> {
        match Locator::parse(route) {
            Some(Locator::Id(id)) => self.get_by_id(&id, None).await,
            Some(Locator::Slug(slug)) => self.get_by_slug(&slug, None).await,
            None => Ok(None),
        }
    }

    /// Visit pages from `start` towards older ones until `visit` says stop or the chain ends.
    async fn walk<F>(&self, start: Option<Arc<Page>>, mut visit: F) -> Result<()>
    where
        F: FnMut(&dyn PageHandler, &Page) -> Step + Send,
    {
        let mut visited: HashSet<Url> = HashSet::new();
        let mut page = match start {
            Some(page) => page,
            None => {
                visited.insert(self.loader.base().clone());
                self.head().await
            },
        };

        loop {
            let handler = self.registry.resolve(&page)?;
            if visit(handler.as_ref(), &page) == Step::Stop {
                return Ok(());
            }

            let Some(reference) = handler.predecessor(&page).cloned() else {
                return Ok(());
            };
            if let Some(path) = reference.path() {
                let url = self.loader.locate(path)?;
                if !visited.insert(url.clone()) {
                    return Err(Error::Validation(format!(
                        "Page chain loops back to {url}"
                    )));
                }
            }

            match self.loader.resolve(&reference).await? {
                Some(previous) => {
                    debug!("Following chain to {:?}", reference.path());
                    page = previous;
                },
                None => return Ok(()),
            }
        }
    }
}

/// Fetch the head page, or reuse its cached copy if the fetch fails.
async fn load_head(loader: &PageLoader) -> Result<Arc<Page>> {
    let url = loader.base();
    match loader.load(url).await {
        Ok(head) => Ok(head),
        Err(err @ (Error::Fetch { .. } | Error::Network(_))) => {
            match loader.cache().get(url.as_str()).await {
                Some(cached) => {
                    warn!("Using cached head page for {}: {}", url, err);
                    Ok(cached)
                },
                None => Err(err),
            }
        },
        Err(err) => Err(err),
    }
}
