//! # Output Formatting
//!
//! Every query command accepts `--format`:
//!
//! - **Text**: human-readable, colored when writing to a terminal
//! - **JSON**: pretty-printed article objects as stored in the archive pages
//!
//! ```bash
//! quire latest -n 3 --format json | jq '.[].slug'
//! ```
//!
//! Formatters write to any [`std::io::Write`] so they can be checked in tests.

mod json;
mod text;

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use quire_core::{Adjacent, Article};
use serde::Serialize;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Output format for CLI results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON for scripts.
    Json,
}

impl OutputFormat {
    /// Check if this format is machine-readable.
    #[must_use]
    pub const fn is_machine_readable(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// One cached page as shown by `quire cache list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPage {
    pub url: String,
    pub format: String,
    pub last_changed: String,
    pub articles: usize,
}

/// Dispatches results to the formatter for the selected format.
pub struct Printer<W: Write> {
    format: OutputFormat,
    out: W,
}

impl<W: Write> Printer<W> {
    pub const fn new(format: OutputFormat, out: W) -> Self {
        Self { format, out }
    }

    pub fn article(&mut self, article: &Article) -> Result<()> {
        match self.format {
            OutputFormat::Text => TextFormatter::article(&mut self.out, article),
            OutputFormat::Json => JsonFormatter::write(&mut self.out, article),
        }
    }

    pub fn articles(&mut self, articles: &[Article]) -> Result<()> {
        match self.format {
            OutputFormat::Text => TextFormatter::articles(&mut self.out, articles),
            OutputFormat::Json => JsonFormatter::write(&mut self.out, articles),
        }
    }

    pub fn adjacent(&mut self, adjacent: &Adjacent) -> Result<()> {
        match self.format {
            OutputFormat::Text => TextFormatter::adjacent(&mut self.out, adjacent),
            OutputFormat::Json => JsonFormatter::write(&mut self.out, adjacent),
        }
    }

    pub fn cached_pages(&mut self, pages: &[CachedPage]) -> Result<()> {
        match self.format {
            OutputFormat::Text => TextFormatter::cached_pages(&mut self.out, pages),
            OutputFormat::Json => JsonFormatter::write(&mut self.out, pages),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
