//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::content::{AuthorId, EntityId, TermId};

/// Permalink resolver for structured content
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: permalink.toml)
    #[arg(short = 'C', long, global = true, default_value = "permalink.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content store document (overrides [store].path, relative to cwd)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the permalink of an entity
    #[command(visible_alias = "l")]
    Link {
        #[command(flatten)]
        args: LinkArgs,
    },

    /// Print an archive, feed, search or pagination link
    #[command(visible_alias = "a")]
    Archive {
        #[command(subcommand)]
        target: ArchiveTarget,
    },

    /// Print the link of the previous/next entity
    #[command(visible_alias = "adj")]
    Adjacent {
        #[command(flatten)]
        args: AdjacentArgs,
    },

    /// List every visible entity with its permalink
    List {
        /// Output JSON instead of plain lines
        #[arg(short, long)]
        json: bool,
    },

    /// Validate the config and print the derived structures
    #[command(visible_alias = "c")]
    Check,
}

/// Link command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct LinkArgs {
    /// Entity id
    pub id: EntityId,

    /// Resolve the pretty link even for unpublished entities
    #[arg(short, long)]
    pub sample: bool,

    /// Keep %postname% / %pagename% as placeholders
    #[arg(short, long)]
    pub leave_name: bool,

    /// Print the shortlink instead
    #[arg(long, conflicts_with_all = ["sample", "leave_name"])]
    pub short: bool,
}

/// Archive link targets.
#[derive(Subcommand, Debug, Clone)]
pub enum ArchiveTarget {
    /// Site home
    Home,

    /// Year archive
    Year { year: u16 },

    /// Month archive
    Month {
        year: u16,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,
    },

    /// Day archive
    Day {
        year: u16,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=31))]
        day: u8,
    },

    /// Site feed
    Feed {
        /// Feed kind (default: [permalink].default_feed)
        #[arg(short, long)]
        kind: Option<String>,

        /// Comments feed
        #[arg(short, long)]
        comments: bool,
    },

    /// Term archive (category, tag, custom taxonomy)
    Term {
        id: TermId,
        /// Link the feed of this kind instead
        #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
        feed: Option<String>,
    },

    /// Author archive
    Author {
        id: AuthorId,
        /// Link the feed of this kind instead
        #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
        feed: Option<String>,
    },

    /// Search results
    Search {
        query: String,
        /// Link the feed of this kind instead
        #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
        feed: Option<String>,
    },

    /// Post type archive
    Type {
        kind: String,
        /// Link the feed of this kind instead
        #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
        feed: Option<String>,
    },

    /// Page N of an archive at a site-relative path
    Paged {
        path: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
}

/// Adjacent command arguments.
#[derive(clap::Args, Debug, Clone)]
#[command(group(clap::ArgGroup::new("direction").required(true).args(["next", "previous", "first", "last"])))]
pub struct AdjacentArgs {
    /// Entity id
    pub id: EntityId,

    /// Entity published right after
    #[arg(short, long)]
    pub next: bool,

    /// Entity published right before
    #[arg(short, long)]
    pub previous: bool,

    /// Oldest entity of the same kind
    #[arg(long)]
    pub first: bool,

    /// Newest entity of the same kind
    #[arg(long)]
    pub last: bool,

    /// Only entities sharing a term with this one
    #[arg(short, long)]
    pub same_term: bool,

    /// Skip entities carrying any of these terms (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<TermId>,

    /// Taxonomy for --same-term and --exclude
    #[arg(short, long, default_value = "category")]
    pub taxonomy: String,

    /// Resolve as this authenticated user
    #[arg(short, long)]
    pub user: Option<AuthorId>,

    /// Grant the read-private capability
    #[arg(short, long, requires = "user")]
    pub read_private: bool,
}

/// Empty `--feed` means the default feed kind.
pub fn feed_kind(feed: Option<&str>) -> Option<&str> {
    feed.filter(|f| !f.is_empty())
}
