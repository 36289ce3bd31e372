//! # quire-core
//!
//! Data access core for a static blog whose article index is published as a
//! backward-linked chain of JSON pages.
//!
//! The newest articles live on a small head page; every page points at the
//! page holding the articles just older than its own, so a reader only fetches
//! as much history as a query needs.
//!
//! ## Architecture
//!
//! - **Types**: articles, pages, page references and date ranges
//! - **Fetching**: HTTP(S) and `file://` retrieval of page documents
//! - **Caching**: an in-memory tier over a durable on-disk tier, refreshed by `lastChanged`
//! - **Handlers**: page-local query strategies keyed by `format@version`
//! - **Archive**: the chained query engine walking pages newest to oldest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quire_core::{Archive, Config};
//!
//! # async fn demo() -> quire_core::Result<()> {
//! let config = Config::load()?;
//! let archive = Archive::open(&config).await?;
//!
//! if let Some(article) = archive.get_by_slug("hello-world", None).await? {
//!     println!("{} ({})", article.title, article.canonical_path());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Queries fail as a whole; no
//! partial results are returned after a fetch or format error.
//!
//! ```rust,no_run
//! use quire_core::{Archive, Error};
//!
//! # async fn demo(archive: &Archive) {
//! match archive.get_by_date("2024-01-01", "2023-01-01", None).await {
//!     Ok(articles) => println!("{} articles", articles.len()),
//!     Err(e) if e.is_caller_error() => eprintln!("Bad query: {e}"),
//!     Err(e) => eprintln!("[{}] {e}", e.category()),
//! }
//! # }
//! ```

/// Chained query engine
pub mod archive;
/// Two-tier page cache
pub mod cache;
/// Configuration loading and location parsing
pub mod config;
/// Error types and result aliases
pub mod error;
/// HTTP and local file fetching
pub mod fetcher;
/// Page format handlers
pub mod handler;
/// Page reference resolution
pub mod loader;
/// Route to lookup mapping
pub mod locator;
/// Format handler registry
pub mod registry;
/// Durable on-disk page store
pub mod store;
/// Core data types
pub mod types;

// Re-export commonly used types
pub use archive::Archive;
pub use cache::PageCache;
pub use config::{CacheConfig, Config, FetchConfig, SourceConfig, parse_location};
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use handler::{CollectionV1, DateScan, Neighbours, PageHandler};
pub use loader::{PageLoader, PageSource};
pub use locator::Locator;
pub use registry::HandlerRegistry;
pub use store::{FileStore, StoredPage};
pub use types::*;
