//! Rewrite-structure store: the post structure plus every derived variant.
//!
//! Built once from `[permalink]` and read-only afterwards. All derived
//! structures hang off the literal *front* of the post structure, so
//! `/blog/%postname%/` puts date archives at `/blog/2024/` and the default
//! category base at `/blog/category/`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::pattern::{RewritePattern, Token};
use crate::config::PermalinkConfig;
use crate::content::{CATEGORY, TAG};

static MULTI_SLASH: LazyLock<Regex> = LazyLock::new(|| Regex::new("/+").expect("static regex"));

/// Date orderings recognized inside a post structure, first match wins.
const DATE_ENDIANS: [&str; 3] = [
    "%year%/%monthnum%/%day%",
    "%day%/%monthnum%/%year%",
    "%monthnum%/%day%/%year%",
];

/// Derived structures of one custom entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTypeStructure {
    pub single: RewritePattern,
    /// Archive path, `None` when the kind has no archive.
    pub archive: Option<String>,
    pub hierarchical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteStructure {
    permalink: RewritePattern,
    front: String,
    date: RewritePattern,
    year: RewritePattern,
    month: RewritePattern,
    page: RewritePattern,
    category: RewritePattern,
    tag: RewritePattern,
    author: RewritePattern,
    search: RewritePattern,
    pub feed_base: String,
    pub comments_base: String,
    pub pagination_base: String,
    pub default_feed: String,
    post_types: BTreeMap<String, PostTypeStructure>,
}

impl RewriteStructure {
    pub fn from_config(config: &PermalinkConfig) -> Self {
        let permalink = config.structure.clone();
        let front = if permalink.has_tokens() {
            ensure_slashes(permalink.front())
        } else {
            "/".to_string()
        };

        let date = date_structure(&permalink, &front);
        let year = collapse(&date.as_str().replace("%monthnum%", "").replace("%day%", ""));
        let month = collapse(&date.as_str().replace("%day%", ""));

        let category = archive_base(&front, config.category_base.as_deref(), CATEGORY);
        let tag = archive_base(&front, config.tag_base.as_deref(), TAG);

        let post_types = config
            .post_types
            .iter()
            .map(|(name, pt)| {
                let prefix = if pt.with_front { front.as_str() } else { "/" };
                let single = pt
                    .structure
                    .clone()
                    .unwrap_or_else(|| RewritePattern::new(format!("{prefix}{name}/%{name}%")));
                let archive = pt
                    .archive
                    .as_deref()
                    .map(|slug| format!("{prefix}{}", slug.trim_matches('/')));
                let structure = PostTypeStructure {
                    single,
                    archive,
                    hierarchical: pt.hierarchical,
                };
                (name.clone(), structure)
            })
            .collect();

        Self {
            date,
            year: RewritePattern::new(year),
            month: RewritePattern::new(month),
            page: RewritePattern::new("/%pagename%"),
            category: RewritePattern::new(format!("{category}%category%")),
            tag: RewritePattern::new(format!("{tag}%tag%")),
            author: RewritePattern::new(format!("{front}{}/%author%", config.author_base)),
            search: RewritePattern::new(format!("/{}/%search%", config.search_base)),
            feed_base: config.feed_base.clone(),
            comments_base: config.comments_base.clone(),
            pagination_base: config.pagination_base.clone(),
            default_feed: config.default_feed.clone(),
            post_types,
            permalink,
            front,
        }
    }

    /// No structure configured: every link uses its query-string form.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.permalink.is_empty()
    }

    pub fn permalink(&self) -> &RewritePattern {
        &self.permalink
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn date(&self) -> &RewritePattern {
        &self.date
    }

    pub fn year(&self) -> &RewritePattern {
        &self.year
    }

    pub fn month(&self) -> &RewritePattern {
        &self.month
    }

    pub fn page(&self) -> &RewritePattern {
        &self.page
    }

    pub fn author(&self) -> &RewritePattern {
        &self.author
    }

    pub fn search(&self) -> &RewritePattern {
        &self.search
    }

    /// Term archive structure for any taxonomy.
    ///
    /// Category and tag use their configured bases; other taxonomies live
    /// under `<front><taxonomy>/%<taxonomy>%`.
    pub fn term(&self, taxonomy: &str) -> RewritePattern {
        match taxonomy {
            CATEGORY => self.category.clone(),
            TAG => self.tag.clone(),
            other => RewritePattern::new(format!("{}{other}/%{other}%", self.front)),
        }
    }

    pub fn post_type(&self, name: &str) -> Option<&PostTypeStructure> {
        self.post_types.get(name)
    }

    pub fn post_types(&self) -> impl Iterator<Item = (&str, &PostTypeStructure)> {
        self.post_types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_default_feed(&self, feed: &str) -> bool {
        feed == self.default_feed
    }
}

/// `<front><endian>`, moved under `<front>date/` when `%post_id%` sits among
/// the first tokens and numeric date paths would collide with it.
fn date_structure(permalink: &RewritePattern, front: &str) -> RewritePattern {
    let raw = permalink.as_str();
    let endian = DATE_ENDIANS
        .iter()
        .find(|e| raw.contains(*e))
        .copied()
        .unwrap_or(DATE_ENDIANS[0]);

    let id_leads = permalink.tokens().take(3).any(|t| *t == Token::PostId);
    let prefix = if id_leads {
        format!("{front}date/")
    } else {
        front.to_string()
    };
    RewritePattern::new(format!("{prefix}{endian}"))
}

/// Configured bases live at the root; the default base follows the front.
fn archive_base(front: &str, configured: Option<&str>, default: &str) -> String {
    match configured {
        Some(base) => format!("/{base}/"),
        None => format!("{front}{default}/"),
    }
}

fn ensure_slashes(front: &str) -> String {
    let mut out = String::with_capacity(front.len() + 2);
    if !front.starts_with('/') {
        out.push('/');
    }
    out.push_str(front);
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}

fn collapse(path: &str) -> String {
    MULTI_SLASH.replace_all(path, "/").into_owned()
}
