//! Page retrieval over HTTP(S) and from local `file://` paths.
//!
//! [`Fetcher`] is the production [`PageSource`]: it downloads a page body and
//! decodes it, reporting non-success statuses as [`Error::Fetch`].
//!
//! ```rust,no_run
//! use quire_core::{Fetcher, PageSource};
//! use url::Url;
//!
//! # async fn demo() -> quire_core::Result<()> {
//! let fetcher = Fetcher::new()?;
//! let url = Url::parse("https://example.com/blog/articles.json")?;
//! let page = fetcher.fetch_page(&url).await?;
//! println!("{} articles", page.articles.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::loader::PageSource;
use crate::{Error, Page, Result};

/// Retrieves page files over HTTP(S) or from the local filesystem (`file://`).
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with configured HTTP client
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(timeout, concat!("quire/", env!("CARGO_PKG_VERSION")))
    }

    /// Creates a fetcher from the `[fetch]` settings
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(concat!("quire/", env!("CARGO_PKG_VERSION")));
        Self::build(Duration::from_secs(config.timeout_secs), user_agent)
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;
        Ok(Self { client })
    }

    /// Fetches the raw body at `url`
    ///
    /// A non-success status maps to [`Error::Fetch`]; a missing local file is
    /// reported the same way with status 404.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => read_local(url).await,
            other => Err(Error::InvalidUrl(format!(
                "Unsupported URL scheme '{other}' in {url}"
            ))),
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await?;
        info!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

async fn read_local(url: &Url) -> Result<String> {
    let path = url
        .to_file_path()
        .map_err(|()| Error::InvalidUrl(format!("Not a local file path: {url}")))?;

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            debug!("Read {} bytes from {}", content.len(), path.display());
            Ok(content)
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::Fetch {
            url: url.to_string(),
            status: 404,
        }),
        Err(e) => Err(Error::Io(e)),
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        let body = self.fetch(url).await?;
        Page::from_json(&body)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
// Use Fetcher::new() directly and handle the Result.
