//! Text output formatting

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use quire_core::{Adjacent, Article};

use super::CachedPage;

pub struct TextFormatter;

impl TextFormatter {
    /// One line per article: id, date, title and tags
    pub fn articles<W: Write>(out: &mut W, articles: &[Article]) -> Result<()> {
        if articles.is_empty() {
            writeln!(out, "No articles found")?;
            return Ok(());
        }

        for article in articles {
            Self::summary_line(out, article)?;
        }
        Ok(())
    }

    /// Full article header block
    pub fn article<W: Write>(out: &mut W, article: &Article) -> Result<()> {
        writeln!(out, "{}", article.title.bold())?;
        writeln!(out, "  {}", article.canonical_path().cyan())?;
        writeln!(out, "  published {}", article.date.date_string())?;

        let modified = article.modified_at();
        if modified != article.date {
            writeln!(out, "  modified  {}", modified.date_string())?;
        }
        if !article.authors.is_empty() {
            writeln!(out, "  by {}", article.authors.join(", "))?;
        }
        if !article.tags.is_empty() {
            writeln!(out, "  tags {}", article.tags.join(", ").dimmed())?;
        }
        if let Some(summary) = article.summary.as_deref().filter(|s| !s.is_empty()) {
            writeln!(out)?;
            writeln!(out, "{summary}")?;
        }
        Ok(())
    }

    pub fn adjacent<W: Write>(out: &mut W, adjacent: &Adjacent) -> Result<()> {
        for (label, article) in [("next", &adjacent.next), ("previous", &adjacent.previous)] {
            match article {
                Some(article) => {
                    write!(out, "{:<9}", label.bold())?;
                    Self::summary_line(out, article)?;
                },
                None => writeln!(out, "{:<9}{}", label.bold(), "none".dimmed())?,
            }
        }
        Ok(())
    }

    pub fn cached_pages<W: Write>(out: &mut W, pages: &[CachedPage]) -> Result<()> {
        if pages.is_empty() {
            writeln!(out, "{} Cache is empty", "ℹ".blue())?;
            return Ok(());
        }

        for page in pages {
            writeln!(
                out,
                "{}  {}  {} articles  {}",
                page.last_changed,
                page.format.dimmed(),
                page.articles,
                page.url
            )?;
        }
        Ok(())
    }

    fn summary_line<W: Write>(out: &mut W, article: &Article) -> Result<()> {
        write!(
            out,
            "{}  {}  {}",
            article.id.yellow(),
            article.date.date_string(),
            article.title
        )?;
        if !article.tags.is_empty() {
            write!(out, "  {}", format!("[{}]", article.tags.join(", ")).dimmed())?;
        }
        writeln!(out)?;
        Ok(())
    }
}
