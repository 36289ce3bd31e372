//! Mapping article routes to lookups.
//!
//! Routes look like `<id>/<slug>/`, `<id>/` or `<slug>/`. A leading segment in
//! article id form selects a lookup by id; anything else is looked up by slug,
//! taken from the second segment when present.

use crate::types::is_article_id;

/// How an article route should be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Look up by article id.
    Id(String),
    /// Look up by slug.
    Slug(String),
}

impl Locator {
    /// Parse a route relative to the archive root.
    ///
    /// Returns `None` for the root route itself.
    ///
    /// ```rust
    /// use quire_core::Locator;
    ///
    /// assert_eq!(Locator::parse("a1b2c3/hello-world/"), Some(Locator::Id("a1b2c3".into())));
    /// assert_eq!(Locator::parse("hello-world"), Some(Locator::Slug("hello-world".into())));
    /// assert_eq!(Locator::parse("/"), None);
    /// ```
    #[must_use]
    pub fn parse(route: &str) -> Option<Self> {
        let trimmed = route.trim().trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }

        let mut segments = trimmed.split('/');
        let first = segments.next()?;
        if is_article_id(first) {
            return Some(Self::Id(first.to_string()));
        }

        let slug = segments.next().filter(|s| !s.is_empty()).unwrap_or(first);
        Some(Self::Slug(slug.to_string()))
    }
}
