//! `[permalink]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [permalink]
//! structure = "/%year%/%monthnum%/%postname%/"
//! category_base = "topics"
//! default_category = 1
//!
//! [permalink.trailing_slash_overrides]
//! feed = false
//!
//! [permalink.post_types.product]
//! archive = "products"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::content::TermId;
use crate::permalink::{ArchiveKind, RewritePattern, SlashPolicy, Token};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PermalinkConfig {
    /// Post structure. Empty means plain query-string links everywhere.
    pub structure: RewritePattern,

    /// Category archive base. Unset means `category` under the structure front.
    pub category_base: Option<String>,

    /// Tag archive base. Unset means `tag` under the structure front.
    pub tag_base: Option<String>,

    pub author_base: String,
    pub search_base: String,
    pub pagination_base: String,
    pub comments_base: String,
    pub feed_base: String,

    /// Feed kind served at the bare feed path.
    pub default_feed: String,

    /// Term used for `%category%` when an entity has none.
    pub default_category: Option<TermId>,

    /// Site-wide trailing slash. Unset means "does the structure end in `/`".
    pub trailing_slash: Option<bool>,

    pub trailing_slash_overrides: BTreeMap<ArchiveKind, bool>,

    /// Registered custom entity kinds.
    pub post_types: BTreeMap<String, PostTypeConfig>,
}

impl Default for PermalinkConfig {
    fn default() -> Self {
        Self {
            structure: RewritePattern::default(),
            category_base: None,
            tag_base: None,
            author_base: "author".into(),
            search_base: "search".into(),
            pagination_base: "page".into(),
            comments_base: "comments".into(),
            feed_base: "feed".into(),
            default_feed: "rss2".into(),
            default_category: None,
            trailing_slash: None,
            trailing_slash_overrides: BTreeMap::new(),
            post_types: BTreeMap::new(),
        }
    }
}

/// `[permalink.post_types.<name>]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PostTypeConfig {
    /// Single-entity structure. Unset means `<front><name>/%<name>%`.
    pub structure: Option<RewritePattern>,

    /// Archive slug. Unset means the kind has no archive.
    pub archive: Option<String>,

    /// Resolve the kind token to the ancestor path.
    pub hierarchical: bool,

    /// Prefix derived structures with the post structure front.
    pub with_front: bool,
}

impl Default for PostTypeConfig {
    fn default() -> Self {
        Self {
            structure: None,
            archive: None,
            hierarchical: false,
            with_front: true,
        }
    }
}

impl PermalinkConfig {
    pub const STRUCTURE: FieldPath = FieldPath::new("permalink.structure");
    pub const CATEGORY_BASE: FieldPath = FieldPath::new("permalink.category_base");
    pub const TAG_BASE: FieldPath = FieldPath::new("permalink.tag_base");
    pub const AUTHOR_BASE: FieldPath = FieldPath::new("permalink.author_base");
    pub const SEARCH_BASE: FieldPath = FieldPath::new("permalink.search_base");
    pub const PAGINATION_BASE: FieldPath = FieldPath::new("permalink.pagination_base");
    pub const COMMENTS_BASE: FieldPath = FieldPath::new("permalink.comments_base");
    pub const FEED_BASE: FieldPath = FieldPath::new("permalink.feed_base");
    pub const DEFAULT_FEED: FieldPath = FieldPath::new("permalink.default_feed");
    pub const POST_TYPES: FieldPath = FieldPath::new("permalink.post_types");

    /// Effective site-wide slash policy.
    pub fn slash_policy(&self) -> SlashPolicy {
        let trailing = self
            .trailing_slash
            .unwrap_or_else(|| self.structure.as_str().ends_with('/'));
        SlashPolicy {
            trailing,
            overrides: self.trailing_slash_overrides.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }

    #[inline]
    pub fn is_plain(&self) -> bool {
        self.structure.is_empty()
    }

    /// Adjust values that are usable after a fix-up, warning about each.
    pub fn normalize(&mut self, diag: &mut ConfigDiagnostics) {
        let structure = self.structure.as_str();
        if !structure.is_empty() && !structure.starts_with('/') {
            diag.warn(Self::STRUCTURE, "structure must start with '/', prefixed one");
            self.structure = RewritePattern::new(format!("/{structure}"));
        }

        for (field, base) in [
            (Self::AUTHOR_BASE, &mut self.author_base),
            (Self::SEARCH_BASE, &mut self.search_base),
            (Self::PAGINATION_BASE, &mut self.pagination_base),
            (Self::COMMENTS_BASE, &mut self.comments_base),
            (Self::FEED_BASE, &mut self.feed_base),
        ] {
            trim_base(field, base, diag);
        }
        for (field, base) in [
            (Self::CATEGORY_BASE, &mut self.category_base),
            (Self::TAG_BASE, &mut self.tag_base),
        ] {
            if let Some(base) = base {
                trim_base(field, base, diag);
            }
        }
    }

    /// Validate permalink configuration.
    ///
    /// # Checks
    /// - bases are not empty
    /// - `default_feed` is not empty
    /// - every custom post-type structure identifies a single entity
    /// - a structure that cannot identify a single entity gets a hint
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, base) in [
            (Self::AUTHOR_BASE, self.author_base.as_str()),
            (Self::SEARCH_BASE, self.search_base.as_str()),
            (Self::PAGINATION_BASE, self.pagination_base.as_str()),
            (Self::COMMENTS_BASE, self.comments_base.as_str()),
            (Self::FEED_BASE, self.feed_base.as_str()),
            (Self::CATEGORY_BASE, self.category_base.as_deref().unwrap_or("category")),
            (Self::TAG_BASE, self.tag_base.as_deref().unwrap_or("tag")),
        ] {
            if base.is_empty() {
                diag.error_with_hint(
                    field,
                    "base must not be empty",
                    format!("remove {field} to use the default"),
                );
            }
        }

        if self.default_feed.trim().is_empty() {
            diag.error(Self::DEFAULT_FEED, "default feed must not be empty");
        }

        if !self.is_plain() && !self.structure.tokens().any(Token::is_unique) {
            diag.hint(
                Self::STRUCTURE,
                format!(
                    "'{}' has neither %postname% nor %post_id%, links may be ambiguous",
                    self.structure
                ),
            );
        }

        for (name, post_type) in &self.post_types {
            if matches!(name.as_str(), "post" | "page") || name.is_empty() {
                diag.error(
                    Self::POST_TYPES,
                    format!("'{name}' is reserved and cannot be registered as a post type"),
                );
                continue;
            }
            if let Some(structure) = &post_type.structure {
                let own = Token::Named(name.clone());
                if !structure.contains(&own) && !structure.contains(&Token::PostId) {
                    diag.error_with_hint(
                        Self::POST_TYPES,
                        format!("structure of '{name}' identifies no single entity"),
                        format!("include {} or %post_id%", own.placeholder()),
                    );
                }
            }
            if post_type.archive.as_deref().is_some_and(|a| a.trim_matches('/').is_empty()) {
                diag.error(
                    Self::POST_TYPES,
                    format!("archive slug of '{name}' must not be empty"),
                );
            }
        }
    }
}

fn trim_base(field: FieldPath, base: &mut String, diag: &mut ConfigDiagnostics) {
    let trimmed = base.trim_matches('/');
    if trimmed.len() != base.len() {
        diag.warn(field, format!("'{base}' trimmed to '{trimmed}'"));
        *base = trimmed.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn diagnose(extra: &str) -> (PermalinkConfig, ConfigDiagnostics) {
        let mut config = test_parse_config(extra).permalink;
        let mut diag = ConfigDiagnostics::new();
        config.normalize(&mut diag);
        config.validate(&mut diag);
        (config, diag)
    }

    #[test]
    fn test_defaults() {
        let config = PermalinkConfig::default();
        assert!(config.is_plain());
        assert_eq!(config.feed_base, "feed");
        assert_eq!(config.default_feed, "rss2");
        assert!(config.category_base.is_none());
        assert!(!config.slash_policy().trailing);
    }

    #[test]
    fn test_trailing_slash_follows_structure() {
        let config = test_parse_config("[permalink]\nstructure = \"/%postname%/\"");
        assert!(config.permalink.slash_policy().trailing);

        let config =
            test_parse_config("[permalink]\nstructure = \"/%postname%/\"\ntrailing_slash = false");
        assert!(!config.permalink.slash_policy().trailing);
    }

    #[test]
    fn test_overrides_parse() {
        let config = test_parse_config(
            "[permalink]\nstructure = \"/%postname%/\"\n[permalink.trailing_slash_overrides]\nfeed = false\nsingle_feed = false",
        );
        let policy = config.permalink.slash_policy();
        assert!(!policy.trailing_for(ArchiveKind::Feed));
        assert!(!policy.trailing_for(ArchiveKind::SingleFeed));
        assert!(policy.trailing_for(ArchiveKind::Year));
    }

    #[test]
    fn test_bases_trimmed_with_warning() {
        let (config, diag) = diagnose("[permalink]\nauthor_base = \"/writers/\"\ntag_base = \"/t\"");
        assert_eq!(config.author_base, "writers");
        assert_eq!(config.tag_base.as_deref(), Some("t"));
        assert_eq!(diag.warnings().len(), 2);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_empty_base_is_error() {
        let (_, diag) = diagnose("[permalink]\nsearch_base = \"/\"");
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field, PermalinkConfig::SEARCH_BASE);
    }

    #[test]
    fn test_structure_gets_leading_slash() {
        let (config, diag) = diagnose("[permalink]\nstructure = \"%postname%/\"");
        assert_eq!(config.structure.as_str(), "/%postname%/");
        assert_eq!(diag.warnings().len(), 1);
    }

    #[test]
    fn test_ambiguous_structure_is_hint() {
        let (_, diag) = diagnose("[permalink]\nstructure = \"/%year%/%monthnum%/\"");
        assert!(diag.is_empty());
        assert_eq!(diag.hints().len(), 1);

        let (_, diag) = diagnose("[permalink]\nstructure = \"/%year%/%postname%/\"");
        assert!(diag.hints().is_empty());
    }

    #[test]
    fn test_post_type_structure_needs_own_token() {
        let (_, diag) = diagnose(
            "[permalink.post_types.product]\nstructure = \"/products/%year%/\"",
        );
        assert_eq!(diag.len(), 1);

        let (_, diag) = diagnose(
            "[permalink.post_types.product]\nstructure = \"/products/%product%/\"\narchive = \"products\"",
        );
        assert!(diag.is_empty());
    }

    #[test]
    fn test_reserved_post_type() {
        let (_, diag) = diagnose("[permalink.post_types.page]\narchive = \"pages\"");
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_post_type_defaults() {
        let config = test_parse_config("[permalink.post_types.product]");
        let product = &config.permalink.post_types["product"];
        assert!(product.with_front);
        assert!(product.archive.is_none());
        assert!(!product.hierarchical);
    }
}
