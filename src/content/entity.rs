//! Content records: entities, terms and authors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::date::deserialize_timestamp;

pub type EntityId = u64;
pub type TermId = u64;
pub type AuthorId = u64;

/// Taxonomy every post belongs to by default.
pub const CATEGORY: &str = "category";
/// Flat tag taxonomy.
pub const TAG: &str = "tag";

/// Publication status of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[serde(alias = "publish")]
    Published,
    Draft,
    Pending,
    #[serde(alias = "future")]
    Scheduled,
    Private,
    #[serde(alias = "trash")]
    Trashed,
}

impl Status {
    /// Not yet public: links use the query-string form unless sampled.
    #[inline]
    pub const fn is_unpublished(self) -> bool {
        matches!(self, Self::Draft | Self::Pending | Self::Scheduled)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Private => "private",
            Self::Trashed => "trashed",
        }
    }
}

/// Content type of an entity.
///
/// `post` and `page` are built in; anything else is a custom kind whose
/// permalink structure comes from `[permalink.post_types.<name>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityKind {
    #[default]
    Post,
    Page,
    Custom(String),
}

impl EntityKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
            Self::Custom(name) => name,
        }
    }

    #[inline]
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page)
    }
}

impl From<String> for EntityKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "post" => Self::Post,
            "page" => Self::Page,
            _ => Self::Custom(s),
        }
    }
}

impl From<&str> for EntityKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored content entity (post, page or custom kind).
///
/// Owned by the store; resolution only borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(default)]
    pub kind: EntityKind,
    /// URL slug (`hello-world`). May be empty for unsaved drafts.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    /// Parent entity for hierarchical kinds (pages).
    #[serde(default)]
    pub parent: Option<EntityId>,
    /// Publication time, unix seconds UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub published: i64,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub author: Option<AuthorId>,
}

impl Entity {
    pub fn new(id: EntityId, kind: impl Into<EntityKind>, slug: impl Into<String>, published: i64) -> Self {
        Self {
            id,
            kind: kind.into(),
            slug: slug.into(),
            title: String::new(),
            parent: None,
            published,
            status: Status::Published,
            author: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_author(mut self, author: AuthorId) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// A taxonomy term (category, tag, or custom taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    #[serde(default = "default_taxonomy")]
    pub taxonomy: String,
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<TermId>,
}

fn default_taxonomy() -> String {
    CATEGORY.to_string()
}

impl Term {
    pub fn new(id: TermId, taxonomy: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            taxonomy: taxonomy.into(),
            slug: slug.into(),
            name: String::new(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: TermId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// An entity author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    /// URL-safe author name.
    pub nicename: String,
    #[serde(default)]
    pub display_name: String,
}

impl Author {
    pub fn new(id: AuthorId, nicename: impl Into<String>) -> Self {
        Self {
            id,
            nicename: nicename.into(),
            display_name: String::new(),
        }
    }
}
