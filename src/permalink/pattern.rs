//! Rewrite patterns: literal path text interleaved with `%token%` placeholders.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `%name%` placeholders. A lone or unbalanced `%` stays literal.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z0-9_]+)%").expect("static regex"));

/// A recognized placeholder.
///
/// `Named` covers everything else between percent signs. Whether it means
/// anything (a custom kind or taxonomy token) is decided at resolution time;
/// otherwise it passes through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Year,
    MonthNum,
    Day,
    Hour,
    Minute,
    Second,
    PostId,
    PostName,
    Category,
    Tag,
    Author,
    PageName,
    Search,
    Named(String),
}

impl Token {
    pub fn parse(name: &str) -> Self {
        match name {
            "year" => Self::Year,
            "monthnum" => Self::MonthNum,
            "day" => Self::Day,
            "hour" => Self::Hour,
            "minute" => Self::Minute,
            "second" => Self::Second,
            "post_id" => Self::PostId,
            "postname" => Self::PostName,
            "category" => Self::Category,
            "tag" => Self::Tag,
            "author" => Self::Author,
            "pagename" => Self::PageName,
            "search" => Self::Search,
            other => Self::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Year => "year",
            Self::MonthNum => "monthnum",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::PostId => "post_id",
            Self::PostName => "postname",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Author => "author",
            Self::PageName => "pagename",
            Self::Search => "search",
            Self::Named(name) => name,
        }
    }

    /// Placeholder as written in a pattern (`%name%`).
    pub fn placeholder(&self) -> String {
        format!("%{}%", self.name())
    }

    /// Tokens that identify a single entity on their own.
    pub const fn is_unique(&self) -> bool {
        matches!(self, Self::PostId | Self::PostName)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Token(Token),
}

/// Immutable, pre-parsed rewrite pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RewritePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(&raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(raw[last..whole.start()].to_string()));
            }
            segments.push(Segment::Token(Token::parse(name.as_str())));
            last = whole.end();
        }
        if last < raw.len() {
            segments.push(Segment::Literal(raw[last..].to_string()));
        }

        Self { raw, segments }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Token(t) => Some(t),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens().next().is_some()
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.tokens().any(|t| t == token)
    }

    /// Literal text before the first token (`/blog/` for `/blog/%postname%/`).
    pub fn front(&self) -> &str {
        match self.segments.first() {
            Some(Segment::Literal(text)) if self.has_tokens() => text,
            Some(Segment::Token(_)) => "",
            _ => &self.raw,
        }
    }
}

impl fmt::Display for RewritePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for RewritePattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RewritePattern {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Serialize for RewritePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RewritePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
