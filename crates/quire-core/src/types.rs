//! Core data types: timestamps, articles, pages and page references.
//!
//! These types mirror the versioned JSON page files of an article archive.
//! Fields that the query engine does not interpret are preserved, so a page
//! read from the network can be written to the durable cache and read back
//! without losing anything the rendering side needs.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{Error, Result};

#[allow(clippy::expect_used)]
static ARTICLE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{6}$").expect("article id pattern is valid"));

#[allow(clippy::expect_used)]
static YEAR_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?:-(?P<month>\d{2}))?$").expect("year-month pattern is valid")
});

/// Returns `true` if `candidate` has the fixed article id form: six lowercase hex characters.
#[must_use]
pub fn is_article_id(candidate: &str) -> bool {
    ARTICLE_ID.is_match(candidate)
}

/// A calendar instant in UTC.
///
/// Accepts RFC 3339 strings, ISO 8601 date-times with a `Z` or an offset in
/// basic (`+0100`) or extended (`+01:00`) form, naive date-times which are read
/// as UTC, and the calendar forms `YYYY-MM-DD`, `YYYY-MM` and `YYYY`, which
/// mean the first instant of that period in UTC.
///
/// ```rust
/// use quire_core::Timestamp;
///
/// let a: Timestamp = "2024-01-02".parse()?;
/// let b: Timestamp = "2024-01-02T00:00:00Z".parse()?;
/// assert_eq!(a, b);
/// assert!("yesterday".parse::<Timestamp>().is_err());
/// # Ok::<(), quire_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse a timestamp, failing with [`Error::Validation`] on anything that is not a calendar date.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        for pattern in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"] {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, pattern) {
                return Ok(Self(dt.with_timezone(&Utc)));
            }
        }

        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
                return Ok(Self(naive.and_utc()));
            }
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .ok()
            .or_else(|| period_start(trimmed))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(|| Error::Validation(format!("Invalid ISO date string: '{input}'")))
    }

    /// Borrow the underlying `chrono` value.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The calendar date part, formatted `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

/// First day of a `YYYY` or `YYYY-MM` period.
fn period_start(input: &str) -> Option<NaiveDate> {
    let caps = YEAR_MONTH.captures(input)?;
    let year = caps.name("year")?.as_str().parse().ok()?;
    let month = match caps.name("month") {
        Some(month) => month.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A closed interval of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest instant covered.
    pub from: Timestamp,
    /// Latest instant covered.
    pub to: Timestamp,
}

impl DateRange {
    /// Parse a range from two date strings.
    ///
    /// Fails with [`Error::Validation`] when either bound does not parse or
    /// when `from` lies after `to`.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        let from = Timestamp::parse(from)?;
        let to = Timestamp::parse(to)?;
        Self::new(from, to)
    }

    /// Build a range, rejecting inverted bounds.
    pub fn new(from: Timestamp, to: Timestamp) -> Result<Self> {
        if from > to {
            return Err(Error::Validation(
                "Start date must be before end date".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    /// Whether `at` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, at: Timestamp) -> bool {
        self.from <= at && at <= self.to
    }

    /// Whether the two closed intervals share at least one instant.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.from <= other.to && self.to >= other.from
    }
}

/// Body of an article as consumed by renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
    /// Markup format of `body`, e.g. `markdown`.
    pub format: String,
    /// Raw article body.
    pub body: String,
}

/// One entry of an article's edit history, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleChange {
    /// When the change was published.
    pub date: Timestamp,
    /// Remaining change fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single published article.
///
/// Only `id`, `slug`, `title`, `date`, `tags` and `authors` take part in
/// queries; the remaining fields travel along for the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Six lowercase hex characters, unique across the chain.
    pub id: String,
    /// URL-safe name, unique across the chain.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Publication date.
    pub date: Timestamp,
    /// Tags attached to the article.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Authors of the article.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Short description used for previews and metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Article body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ArticleContent>,
    /// Edit history, newest first.
    #[serde(default)]
    pub changes: Vec<ArticleChange>,
    /// Optional social card image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Fields not known to this crate.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    /// Whether every tag in `tags` is attached to this article.
    #[must_use]
    pub fn has_all_tags(&self, tags: &[String]) -> bool {
        tags.iter().all(|tag| self.tags.contains(tag))
    }

    /// Whether every author in `authors` is listed on this article.
    #[must_use]
    pub fn has_all_authors(&self, authors: &[String]) -> bool {
        authors.iter().all(|author| self.authors.contains(author))
    }

    /// Date of the most recent change, or the publication date if never edited.
    #[must_use]
    pub fn modified_at(&self) -> Timestamp {
        self.changes.first().map_or(self.date, |change| change.date)
    }

    /// Canonical route of the article: `<id>/<slug>/`.
    #[must_use]
    pub fn canonical_path(&self) -> String {
        format!("{}/{}/", self.id, self.slug)
    }
}

/// Reference to a page: where to find it and how fresh a cached copy must be.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    /// Location of the page, relative to the head page or absolute.
    #[serde(default)]
    pub path: Option<String>,
    /// Cached copies older than this are stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<Timestamp>,
}

impl PageRef {
    /// Reference a page without a staleness token.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            last_changed: None,
        }
    }

    /// Attach a staleness token.
    #[must_use]
    pub const fn with_last_changed(mut self, last_changed: Timestamp) -> Self {
        self.last_changed = Some(last_changed);
        self
    }

    /// The referenced location, or `None` if the reference points nowhere.
    ///
    /// An empty path counts as no reference.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether a cached page last changed at `cached` may be reused for this reference.
    #[must_use]
    pub fn accepts(&self, cached: Timestamp) -> bool {
        self.last_changed.is_none_or(|wanted| cached >= wanted)
    }
}

/// The `(format, version)` pair a page declares, written `format@version`.
///
/// ```rust
/// use quire_core::FormatKey;
///
/// let key: FormatKey = "article-collection@1".parse()?;
/// assert_eq!(key.format, "article-collection");
/// assert_eq!(key.version, 1);
/// assert!("article-collection".parse::<FormatKey>().is_err());
/// # Ok::<(), quire_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatKey {
    /// Format family name.
    pub format: String,
    /// Format revision.
    pub version: u32,
}

impl FormatKey {
    /// Build a key from its parts.
    pub fn new(format: impl Into<String>, version: u32) -> Self {
        Self {
            format: format.into(),
            version,
        }
    }
}

impl FromStr for FormatKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Validation(format!("Invalid formatVersion: '{s}'"));

        let (format, version) = s.split_once('@').ok_or_else(invalid)?;
        if format.is_empty() || version.contains('@') {
            return Err(invalid());
        }
        let version = version.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self::new(format, version))
    }
}

impl fmt::Display for FormatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.format, self.version)
    }
}

/// One page of the archive: a newest-first slice of articles plus a link to the next-older page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Format family of the page file.
    pub format: String,
    /// Format revision of the page file.
    pub version: u32,
    /// When the page content last changed.
    pub last_changed: Timestamp,
    /// Interval bounding the dates of every contained article.
    pub range: DateRange,
    /// Articles, newest first.
    #[serde(default)]
    pub articles: Vec<Article>,
    /// Next-older page, if any.
    #[serde(default)]
    pub previous: Option<PageRef>,
    /// Fields not known to this crate.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    /// Decode a page from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The key used to select a handler for this page.
    #[must_use]
    pub fn format_key(&self) -> FormatKey {
        FormatKey::new(self.format.clone(), self.version)
    }

    /// Reference to the predecessor page, if one exists.
    #[must_use]
    pub fn predecessor(&self) -> Option<&PageRef> {
        self.previous.as_ref().filter(|r| r.path().is_some())
    }
}

/// Neighbours of an article in chain order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjacent {
    /// The next older article.
    pub previous: Option<Article>,
    /// The next more recent article on the same page.
    pub next: Option<Article>,
}
