//! Offline page cache commands

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use quire_core::{FileStore, PageCache};

use super::Outcome;
use crate::output::{CachedPage, Printer};

/// List every page held by the durable cache under `root`.
pub async fn list<W: Write>(root: &std::path::Path, printer: &mut Printer<W>) -> Result<Outcome> {
    let cache = PageCache::open(FileStore::new(root)).await?;

    let mut pages = Vec::new();
    for url in cache.keys().await {
        if let Some(page) = cache.get(&url).await {
            pages.push(CachedPage {
                format: page.format_key().to_string(),
                last_changed: page.last_changed.to_string(),
                articles: page.articles.len(),
                url,
            });
        }
    }

    printer.cached_pages(&pages)?;
    Ok(Outcome::Done)
}

/// Remove every cached page under `root`.
pub async fn clear<W: Write>(root: &std::path::Path, mut out: W) -> Result<Outcome> {
    let cache = PageCache::open(FileStore::new(root)).await?;
    let count = cache.len().await;
    cache.clear().await?;

    writeln!(out, "{} Cleared {count} cached page(s)", "✓".green())?;
    Ok(Outcome::Done)
}
