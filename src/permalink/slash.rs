//! Trailing-slash policy.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// What a generated link points at. Drives per-kind slash overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    Home,
    Single,
    Page,
    Year,
    Month,
    Day,
    Feed,
    SingleFeed,
    Category,
    Tag,
    Term,
    Author,
    Search,
    PostTypeArchive,
    Paged,
}

impl ArchiveKind {
    pub const ALL: [Self; 15] = [
        Self::Home,
        Self::Single,
        Self::Page,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Feed,
        Self::SingleFeed,
        Self::Category,
        Self::Tag,
        Self::Term,
        Self::Author,
        Self::Search,
        Self::PostTypeArchive,
        Self::Paged,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Single => "single",
            Self::Page => "page",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Feed => "feed",
            Self::SingleFeed => "single_feed",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Term => "term",
            Self::Author => "author",
            Self::Search => "search",
            Self::PostTypeArchive => "post_type_archive",
            Self::Paged => "paged",
        }
    }
}

/// Site-wide trailing-slash setting with optional per-kind overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlashPolicy {
    pub trailing: bool,
    pub overrides: FxHashMap<ArchiveKind, bool>,
}

impl SlashPolicy {
    pub fn new(trailing: bool) -> Self {
        Self {
            trailing,
            overrides: FxHashMap::default(),
        }
    }

    pub fn with_override(mut self, kind: ArchiveKind, trailing: bool) -> Self {
        self.overrides.insert(kind, trailing);
        self
    }

    pub fn trailing_for(&self, kind: ArchiveKind) -> bool {
        self.overrides.get(&kind).copied().unwrap_or(self.trailing)
    }

    pub fn apply(&self, path: &str, kind: ArchiveKind) -> String {
        normalize(path, self.trailing_for(kind))
    }
}

/// Force exactly one or zero trailing slashes on the path part of `path`.
///
/// Anything from the first `?` or `#` on is preserved untouched.
pub fn normalize(path: &str, trailing: bool) -> String {
    let split = path.find(['?', '#']).unwrap_or(path.len());
    let (head, tail) = path.split_at(split);
    let head = head.trim_end_matches('/');

    let mut out = String::with_capacity(path.len() + 1);
    out.push_str(head);
    if trailing {
        out.push('/');
    }
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_and_removes() {
        assert_eq!(normalize("/2024/06/hello", true), "/2024/06/hello/");
        assert_eq!(normalize("/2024/06/hello/", false), "/2024/06/hello");
        assert_eq!(normalize("/a///", true), "/a/");
        assert_eq!(normalize("/a///", false), "/a");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["/a/b", "/a/b/", "", "/", "/x?y=1", "/x/#frag", "?p=1"] {
            for trailing in [true, false] {
                let once = normalize(input, trailing);
                assert_eq!(normalize(&once, trailing), once, "input {input:?}");
            }
        }
    }

    #[test]
    fn test_normalize_preserves_query_and_fragment() {
        assert_eq!(normalize("/a/b?x=1/", true), "/a/b/?x=1/");
        assert_eq!(normalize("/a/b/#top/", false), "/a/b#top/");
    }

    #[test]
    fn test_policy_overrides() {
        let policy = SlashPolicy::new(true).with_override(ArchiveKind::Feed, false);
        assert_eq!(policy.apply("/feed/", ArchiveKind::Feed), "/feed");
        assert_eq!(policy.apply("/2024", ArchiveKind::Year), "/2024/");
        assert!(!policy.trailing_for(ArchiveKind::Feed));
        assert!(policy.trailing_for(ArchiveKind::Single));
    }

    #[test]
    fn test_archive_kind_names_match_serde() {
        for kind in ArchiveKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
