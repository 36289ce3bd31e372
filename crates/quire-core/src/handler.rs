//! Page-local query strategies.
//!
//! A [`PageHandler`] answers every query for a single page of one format.
//! It never fetches anything: walking from a page to its predecessor is the
//! job of [`crate::Archive`], which asks the handler of each visited page
//! whether the walk should go on.

use crate::{Article, DateRange, Page, PageRef};

/// Articles of one page matching a date range, plus whether older pages may hold more.
#[derive(Debug, Default)]
pub struct DateScan<'p> {
    /// Matching articles in page order.
    pub matches: Vec<&'p Article>,
    /// Whether the walk should continue to the predecessor page.
    pub continue_older: bool,
}

/// Position of an article within its page.
#[derive(Debug, Default)]
pub struct Neighbours<'p> {
    /// The article just before it in page order (more recent).
    pub next: Option<&'p Article>,
    /// The article just after it in page order (older), if still on this page.
    pub previous: Option<&'p Article>,
}

/// Query strategy for one page format.
///
/// Every operation works on the given page alone.
pub trait PageHandler: Send + Sync {
    /// First article with the given id.
    fn find_by_id<'p>(&self, page: &'p Page, id: &str) -> Option<&'p Article>;

    /// First article with the given slug.
    fn find_by_slug<'p>(&self, page: &'p Page, slug: &str) -> Option<&'p Article>;

    /// Up to `count` articles, newest first.
    fn latest<'p>(&self, page: &'p Page, count: usize) -> Vec<&'p Article>;

    /// Articles dated inside `range`.
    fn by_date<'p>(&self, page: &'p Page, range: &DateRange) -> DateScan<'p>;

    /// Articles carrying every tag in `tags`.
    fn by_tags<'p>(&self, page: &'p Page, tags: &[String]) -> Vec<&'p Article>;

    /// Articles listing every author in `authors`.
    fn by_authors<'p>(&self, page: &'p Page, authors: &[String]) -> Vec<&'p Article>;

    /// Neighbours of the article with the given id, or `None` if it is not on this page.
    fn neighbours<'p>(&self, page: &'p Page, id: &str) -> Option<Neighbours<'p>>;

    /// The most recent article of the page.
    fn newest<'p>(&self, page: &'p Page) -> Option<&'p Article>;

    /// Reference to the next-older page.
    fn predecessor<'p>(&self, page: &'p Page) -> Option<&'p PageRef> {
        page.predecessor()
    }
}

/// Handler for `article-collection@1` pages: articles stored newest first,
/// `range` bounding every article date.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionV1;

impl CollectionV1 {
    /// Format family handled.
    pub const FORMAT: &'static str = "article-collection";
    /// Format revision handled.
    pub const VERSION: u32 = 1;
}

impl PageHandler for CollectionV1 {
    fn find_by_id<'p>(&self, page: &'p Page, id: &str) -> Option<&'p Article> {
        page.articles.iter().find(|a| a.id == id)
    }

    fn find_by_slug<'p>(&self, page: &'p Page, slug: &str) -> Option<&'p Article> {
        page.articles.iter().find(|a| a.slug == slug)
    }

    fn latest<'p>(&self, page: &'p Page, count: usize) -> Vec<&'p Article> {
        page.articles.iter().take(count).collect()
    }

    fn by_date<'p>(&self, page: &'p Page, range: &DateRange) -> DateScan<'p> {
        let matches = if range.intersects(&page.range) {
            page.articles
                .iter()
                .filter(|a| range.contains(a.date))
                .collect()
        } else {
            Vec::new()
        };

        DateScan {
            matches,
            // Older pages can only help if the query reaches back past this page.
            continue_older: range.from < page.range.from,
        }
    }

    fn by_tags<'p>(&self, page: &'p Page, tags: &[String]) -> Vec<&'p Article> {
        page.articles.iter().filter(|a| a.has_all_tags(tags)).collect()
    }

    fn by_authors<'p>(&self, page: &'p Page, authors: &[String]) -> Vec<&'p Article> {
        page.articles
            .iter()
            .filter(|a| a.has_all_authors(authors))
            .collect()
    }

    fn neighbours<'p>(&self, page: &'p Page, id: &str) -> Option<Neighbours<'p>> {
        let index = page.articles.iter().position(|a| a.id == id)?;
        Some(Neighbours {
            next: index.checked_sub(1).and_then(|i| page.articles.get(i)),
            previous: page.articles.get(index + 1),
        })
    }

    fn newest<'p>(&self, page: &'p Page) -> Option<&'p Article> {
        page.articles.first()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Page {
        serde_json::from_value(json!({
            "format": "article-collection",
            "version": 1,
            "lastChanged": "2024-03-01",
            "range": { "from": "2024-01-01", "to": "2024-03-01" },
            "articles": [
                { "id": "00000c", "slug": "third", "title": "Third", "date": "2024-03-01",
                  "tags": ["rust", "async"], "authors": ["ana"] },
                { "id": "00000b", "slug": "second", "title": "Second", "date": "2024-02-01",
                  "tags": ["rust"], "authors": ["ana", "ben"] },
                { "id": "00000a", "slug": "first", "title": "First", "date": "2024-01-01",
                  "tags": ["go"], "authors": ["ben"] }
            ],
            "previous": { "path": "older.json" }
        }))
        .unwrap()
    }

    fn ids(articles: &[&Article]) -> Vec<String> {
        articles.iter().map(|a| a.id.clone()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_lookups() {
        let page = page();
        let h = CollectionV1;

        assert_eq!(h.find_by_id(&page, "00000b").unwrap().slug, "second");
        assert!(h.find_by_id(&page, "ffffff").is_none());
        assert_eq!(h.find_by_slug(&page, "first").unwrap().id, "00000a");
        assert!(h.find_by_slug(&page, "missing").is_none());
        assert_eq!(h.newest(&page).unwrap().id, "00000c");
    }

    #[test]
    fn test_latest_takes_prefix() {
        let page = page();
        let h = CollectionV1;

        assert!(h.latest(&page, 0).is_empty());
        assert_eq!(ids(&h.latest(&page, 2)), vec!["00000c", "00000b"]);
        assert_eq!(h.latest(&page, 10).len(), 3);
    }

    #[test]
    fn test_by_date_inside_page() {
        let page = page();
        let range = DateRange::parse("2024-01-15", "2024-03-01").unwrap();
        let scan = CollectionV1.by_date(&page, &range);

        assert_eq!(ids(&scan.matches), vec!["00000c", "00000b"]);
        assert!(!scan.continue_older);
    }

    #[test]
    fn test_by_date_reaching_back() {
        let page = page();
        let range = DateRange::parse("2023-06-01", "2024-01-01").unwrap();
        let scan = CollectionV1.by_date(&page, &range);

        assert_eq!(ids(&scan.matches), vec!["00000a"]);
        assert!(scan.continue_older);
    }

    #[test]
    fn test_by_date_skips_disjoint_page() {
        let page = page();
        let range = DateRange::parse("2023-01-01", "2023-06-01").unwrap();
        let scan = CollectionV1.by_date(&page, &range);

        assert!(scan.matches.is_empty());
        assert!(scan.continue_older);

        let future = DateRange::parse("2025-01-01", "2025-02-01").unwrap();
        let scan = CollectionV1.by_date(&page, &future);
        assert!(scan.matches.is_empty());
        assert!(!scan.continue_older);
    }

    #[test]
    fn test_tag_and_author_filters() {
        let page = page();
        let h = CollectionV1;

        assert_eq!(
            ids(&h.by_tags(&page, &strings(&["rust"]))),
            vec!["00000c", "00000b"]
        );
        assert_eq!(
            ids(&h.by_tags(&page, &strings(&["rust", "async"]))),
            vec!["00000c"]
        );
        assert!(h.by_tags(&page, &strings(&["rust", "go"])).is_empty());
        assert_eq!(h.by_tags(&page, &[]).len(), 3);

        assert_eq!(
            ids(&h.by_authors(&page, &strings(&["ben"]))),
            vec!["00000b", "00000a"]
        );
        assert_eq!(
            ids(&h.by_authors(&page, &strings(&["ana", "ben"]))),
            vec!["00000b"]
        );
    }

    #[test]
    fn test_neighbours() {
        let page = page();
        let h = CollectionV1;

        let top = h.neighbours(&page, "00000c").unwrap();
        assert!(top.next.is_none());
        assert_eq!(top.previous.unwrap().id, "00000b");

        let middle = h.neighbours(&page, "00000b").unwrap();
        assert_eq!(middle.next.unwrap().id, "00000c");
        assert_eq!(middle.previous.unwrap().id, "00000a");

        let bottom = h.neighbours(&page, "00000a").unwrap();
        assert_eq!(bottom.next.unwrap().id, "00000b");
        assert!(bottom.previous.is_none());

        assert!(h.neighbours(&page, "ffffff").is_none());
    }

    #[test]
    fn test_predecessor_default() {
        let page = page();
        assert_eq!(
            CollectionV1.predecessor(&page).unwrap().path(),
            Some("older.json")
        );
    }
}
