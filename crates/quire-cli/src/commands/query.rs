//! Article query commands

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use quire_core::{Archive, Article};

use super::Outcome;
use crate::output::Printer;

pub async fn latest<W: Write>(
    archive: &Archive,
    count: usize,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let articles = archive.get_latest(count, None).await?;
    printer.articles(&articles)?;
    Ok(Outcome::Done)
}

pub async fn by_id<W: Write>(archive: &Archive, id: &str, printer: &mut Printer<W>) -> Result<Outcome> {
    let article = archive.get_by_id(id, None).await?;
    single(article, id, printer)
}

pub async fn by_slug<W: Write>(
    archive: &Archive,
    slug: &str,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let article = archive.get_by_slug(slug, None).await?;
    single(article, slug, printer)
}

pub async fn show_route<W: Write>(
    archive: &Archive,
    route: &str,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let article = archive.locate(route).await?;
    single(article, route, printer)
}

pub async fn by_date<W: Write>(
    archive: &Archive,
    from: &str,
    to: &str,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let articles = archive.get_by_date(from, to, None).await?;
    printer.articles(&articles)?;
    Ok(Outcome::Done)
}

pub async fn by_tags<W: Write>(
    archive: &Archive,
    tags: &[String],
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let articles = archive.get_by_tags(tags, None).await?;
    printer.articles(&articles)?;
    Ok(Outcome::Done)
}

pub async fn by_authors<W: Write>(
    archive: &Archive,
    authors: &[String],
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let articles = archive.get_by_authors(authors, None).await?;
    printer.articles(&articles)?;
    Ok(Outcome::Done)
}

/// Neighbours of an article; an unknown id is reported as not found.
pub async fn adjacent<W: Write>(
    archive: &Archive,
    id: &str,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    let Some(adjacent) = archive.find_adjacent(id, None).await? else {
        return Ok(not_found(id));
    };
    printer.adjacent(&adjacent)?;
    Ok(Outcome::Done)
}

fn single<W: Write>(
    article: Option<Article>,
    wanted: &str,
    printer: &mut Printer<W>,
) -> Result<Outcome> {
    match article {
        Some(article) => {
            printer.article(&article)?;
            Ok(Outcome::Done)
        },
        None => Ok(not_found(wanted)),
    }
}

fn not_found(wanted: &str) -> Outcome {
    eprintln!("{} Article not found: {wanted}", "✗".red());
    Outcome::NotFound
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use quire_core::{Fetcher, PageCache, parse_location};
    use serde_json::{Value, json};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// A built site on disk: a head page and one older page.
    async fn site() -> (TempDir, Archive) {
        let dir = tempfile::tempdir().unwrap();
        let head = json!({
            "format": "article-collection",
            "version": 1,
            "lastChanged": "2024-01-02",
            "range": { "from": "2024-01-01", "to": "2024-01-02" },
            "articles": [
                { "id": "a3a3a3", "slug": "third", "title": "Third", "date": "2024-01-02", "tags": ["rust"] },
                { "id": "a2a2a2", "slug": "second", "title": "Second", "date": "2024-01-01" }
            ],
            "previous": { "path": "older.json", "lastChanged": "2023-12-31" }
        });
        let older = json!({
            "format": "article-collection",
            "version": 1,
            "lastChanged": "2023-12-31",
            "range": { "from": "2023-12-31", "to": "2023-12-31" },
            "articles": [
                { "id": "a1a1a1", "slug": "first", "title": "First", "date": "2023-12-31", "tags": ["rust"] }
            ]
        });
        fs::write(dir.path().join("articles.json"), head.to_string()).unwrap();
        fs::write(dir.path().join("older.json"), older.to_string()).unwrap();

        let head_url = parse_location(dir.path().join("articles.json").to_str().unwrap()).unwrap();
        let archive = Archive::connect(
            Arc::new(Fetcher::new().unwrap()),
            Arc::new(PageCache::ephemeral()),
            head_url,
        )
        .await
        .unwrap();
        (dir, archive)
    }

    fn printer() -> Printer<Vec<u8>> {
        colored::control::set_override(false);
        Printer::new(OutputFormat::Json, Vec::new())
    }

    fn json_output(printer: Printer<Vec<u8>>) -> Value {
        serde_json::from_slice(&printer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_latest_crosses_pages() {
        let (_dir, archive) = site().await;
        let mut out = printer();

        assert_eq!(latest(&archive, 3, &mut out).await.unwrap(), Outcome::Done);
        let ids: Vec<String> = json_output(out)
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a3a3a3", "a2a2a2", "a1a1a1"]);
    }

    #[tokio::test]
    async fn test_single_lookups() {
        let (_dir, archive) = site().await;

        let mut out = printer();
        assert_eq!(show_route(&archive, "a1a1a1/first/", &mut out).await.unwrap(), Outcome::Done);
        assert_eq!(json_output(out)["slug"], "first");

        let mut out = printer();
        assert_eq!(by_slug(&archive, "missing", &mut out).await.unwrap(), Outcome::NotFound);
        assert!(out.into_inner().is_empty());
    }

    #[tokio::test]
    async fn test_adjacent_unknown_id() {
        let (_dir, archive) = site().await;

        let mut out = printer();
        assert_eq!(adjacent(&archive, "ffffff", &mut out).await.unwrap(), Outcome::NotFound);

        let mut out = printer();
        assert_eq!(adjacent(&archive, "a2a2a2", &mut out).await.unwrap(), Outcome::Done);
        let value = json_output(out);
        assert_eq!(value["next"]["id"], "a3a3a3");
        assert_eq!(value["previous"]["id"], "a1a1a1");

        // Oldest article: found, with no neighbours on either side
        let mut out = printer();
        assert_eq!(adjacent(&archive, "a1a1a1", &mut out).await.unwrap(), Outcome::Done);
        let value = json_output(out);
        assert!(value["next"].is_null());
        assert!(value["previous"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_range_is_an_error() {
        let (_dir, archive) = site().await;
        let mut out = printer();

        let err = by_date(&archive, "2024-02-01", "2024-01-01", &mut out)
            .await
            .unwrap_err();
        assert_eq!(crate::error::exit_code(&err), 2);
    }
}
