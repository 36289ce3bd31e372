//! Command implementations for the quire CLI

mod cache;
mod query;

pub use cache::{clear as clear_cache, list as list_cache};
pub use query::{
    adjacent, by_authors, by_date, by_id, by_slug, by_tags, latest, show_route,
};

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Output was written.
    Done,
    /// The requested article does not exist.
    NotFound,
}
