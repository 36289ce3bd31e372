//! # CLI Structure and Argument Parsing
//!
//! Command-line interface for `quire`, a reader for blogs that publish their
//! article index as a chain of JSON pages.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Newest articles
//! quire --head https://example.com/blog/assets/articles.json latest -n 5
//!
//! # Single article lookups
//! quire get a1b2c3
//! quire slug hello-world
//! quire show a1b2c3/hello-world/
//!
//! # Filters across the whole archive
//! quire range 2023-01-01 2023-12-31 --format json
//! quire tags rust async
//!
//! # Offline page cache
//! quire cache list
//! quire cache clear
//! ```
//!
//! The head page location can also come from `QUIRE_HEAD_URL` or the
//! `source.head_url` config value.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Main CLI structure for the `quire` command
#[derive(Parser, Clone, Debug)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "quire - Query a chained article archive", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// URL or path of the newest archive page
    #[arg(long, global = true, env = "QUIRE_HEAD_URL", value_name = "URL")]
    pub head: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not read or write the offline page cache
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

/// Output format selection shared by every query command.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatArg {
    /// Output format
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        env = "QUIRE_OUTPUT_FORMAT"
    )]
    pub format: OutputFormat,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show the most recent articles
    Latest {
        /// Number of articles to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        #[command(flatten)]
        output: FormatArg,
    },

    /// Show the article with the given id
    Get {
        /// Six-character article id (e.g. a1b2c3)
        id: String,
        #[command(flatten)]
        output: FormatArg,
    },

    /// Show the article with the given slug
    Slug {
        /// Article slug
        slug: String,
        #[command(flatten)]
        output: FormatArg,
    },

    /// Show the article an archive route points at (e.g. a1b2c3/hello-world/)
    Show {
        /// Route relative to the archive root
        route: String,
        #[command(flatten)]
        output: FormatArg,
    },

    /// List articles published within a date range (inclusive)
    Range {
        /// Start date (YYYY-MM-DD or RFC 3339)
        from: String,
        /// End date (YYYY-MM-DD or RFC 3339)
        to: String,
        #[command(flatten)]
        output: FormatArg,
    },

    /// List articles carrying every given tag
    Tags {
        /// Tags to match
        #[arg(required = true)]
        tags: Vec<String>,
        #[command(flatten)]
        output: FormatArg,
    },

    /// List articles written by every given author
    Authors {
        /// Authors to match
        #[arg(required = true)]
        authors: Vec<String>,
        #[command(flatten)]
        output: FormatArg,
    },

    /// Show the articles before and after the given one
    Adjacent {
        /// Six-character article id
        id: String,
        #[command(flatten)]
        output: FormatArg,
    },

    /// Inspect or reset the offline page cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommand {
    /// List cached pages
    List {
        #[command(flatten)]
        output: FormatArg,
    },
    /// Remove every cached page
    Clear,
}

impl Commands {
    /// Output format requested by the command, if it produces formatted output.
    pub const fn format(&self) -> Option<OutputFormat> {
        match self {
            Self::Latest { output, .. }
            | Self::Get { output, .. }
            | Self::Slug { output, .. }
            | Self::Show { output, .. }
            | Self::Range { output, .. }
            | Self::Tags { output, .. }
            | Self::Authors { output, .. }
            | Self::Adjacent { output, .. }
            | Self::Cache {
                command: CacheCommand::List { output },
            } => Some(output.format),
            Self::Cache {
                command: CacheCommand::Clear,
            } => None,
        }
    }
}
