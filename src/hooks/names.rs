//! Hook names applied by the link assembler.
//!
//! These are part of the public extension surface: external code registers
//! against them, so renaming one is a breaking change.

pub const HOME_URL: &str = "home_url";
pub const POST_LINK: &str = "post_link";
pub const PAGE_LINK: &str = "page_link";
pub const POST_TYPE_LINK: &str = "post_type_link";
pub const SHORTLINK: &str = "shortlink";
pub const YEAR_LINK: &str = "year_link";
pub const MONTH_LINK: &str = "month_link";
pub const DAY_LINK: &str = "day_link";
pub const FEED_LINK: &str = "feed_link";
pub const POST_COMMENTS_FEED_LINK: &str = "post_comments_feed_link";
pub const TERM_LINK: &str = "term_link";
pub const TERM_FEED_LINK: &str = "term_feed_link";
pub const AUTHOR_LINK: &str = "author_link";
pub const AUTHOR_FEED_LINK: &str = "author_feed_link";
pub const SEARCH_LINK: &str = "search_link";
pub const SEARCH_FEED_LINK: &str = "search_feed_link";
pub const POST_TYPE_ARCHIVE_LINK: &str = "post_type_archive_link";
pub const POST_TYPE_ARCHIVE_FEED_LINK: &str = "post_type_archive_feed_link";
pub const PAGENUM_LINK: &str = "pagenum_link";
pub const PREVIOUS_POST_LINK: &str = "previous_post_link";
pub const NEXT_POST_LINK: &str = "next_post_link";

/// Every hook above, for validating configured filters.
pub const ALL: &[&str] = &[
    HOME_URL,
    POST_LINK,
    PAGE_LINK,
    POST_TYPE_LINK,
    SHORTLINK,
    YEAR_LINK,
    MONTH_LINK,
    DAY_LINK,
    FEED_LINK,
    POST_COMMENTS_FEED_LINK,
    TERM_LINK,
    TERM_FEED_LINK,
    AUTHOR_LINK,
    AUTHOR_FEED_LINK,
    SEARCH_LINK,
    SEARCH_FEED_LINK,
    POST_TYPE_ARCHIVE_LINK,
    POST_TYPE_ARCHIVE_FEED_LINK,
    PAGENUM_LINK,
    PREVIOUS_POST_LINK,
    NEXT_POST_LINK,
];
