//! Token resolver: substitutes `%token%` placeholders from a target.
//!
//! Resolution never fails. Tokens that mean nothing for the target pass
//! through verbatim; missing related records resolve to an empty string.

use rustc_hash::FxHashSet;

use super::pattern::{RewritePattern, Segment, Token};
use crate::config::SlugConfig;
use crate::content::{Author, CATEGORY, Entity, EntityStore, TAG, Term, TermId};
use crate::debug;
use crate::utils::date::{self, DateTimeUtc, UtcOffset};
use crate::utils::slug::slugify;

/// Year, month or day archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateBucket {
    pub year: u16,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl DateBucket {
    pub const fn year(year: u16) -> Self {
        Self {
            year,
            month: None,
            day: None,
        }
    }

    pub const fn month(year: u16, month: u8) -> Self {
        Self {
            year,
            month: Some(month),
            day: None,
        }
    }

    pub const fn day(year: u16, month: u8, day: u8) -> Self {
        Self {
            year,
            month: Some(month),
            day: Some(day),
        }
    }

    /// Compact `YYYY[MM[DD]]` form used by plain date links.
    pub fn compact(&self) -> String {
        let mut out = format!("{:04}", self.year);
        if let Some(month) = self.month {
            out.push_str(&format!("{month:02}"));
            if let Some(day) = self.day {
                out.push_str(&format!("{day:02}"));
            }
        }
        out
    }
}

/// What a pattern is resolved against.
#[derive(Debug, Clone, Copy)]
pub enum ResolveTarget<'a> {
    Entity(&'a Entity),
    Term(&'a Term),
    Author(&'a Author),
    Date(DateBucket),
    /// Already URL-encoded search query.
    Search(&'a str),
}

/// Everything the resolver may consult besides the target.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub store: &'a dyn EntityStore,
    pub offset: UtcOffset,
    pub default_category: Option<TermId>,
    pub slug: &'a SlugConfig,
    /// Editor preview: unpublished entities still get a pretty link.
    pub sample: bool,
    /// Keep `%postname%` / `%pagename%` / kind tokens verbatim.
    pub leave_name: bool,
    /// Custom kind token resolves to the ancestor path, not just the slug.
    pub hierarchical: bool,
}

/// Substitute every recognized token of `pattern` for `target`.
pub fn resolve(pattern: &RewritePattern, target: ResolveTarget<'_>, ctx: &ResolveContext<'_>) -> String {
    if let ResolveTarget::Entity(entity) = target {
        if !date::in_range(entity.published) {
            debug!("resolve"; "entity {} published {} is out of range, date clamped", entity.id, entity.published);
        }
    }
    let mut out = String::with_capacity(pattern.as_str().len() + 16);
    for segment in pattern.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Token(token) => match token_value(token, target, ctx) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&token.placeholder()),
            },
        }
    }
    out
}

/// `None` means "not applicable to this target": keep the placeholder.
fn token_value(token: &Token, target: ResolveTarget<'_>, ctx: &ResolveContext<'_>) -> Option<String> {
    match target {
        ResolveTarget::Entity(entity) => entity_value(token, entity, ctx),
        ResolveTarget::Term(term) => {
            let applies = match token {
                Token::Category => term.taxonomy == CATEGORY,
                Token::Tag => term.taxonomy == TAG,
                Token::Named(name) => *name == term.taxonomy,
                _ => false,
            };
            applies.then(|| term_path(term, ctx.store))
        }
        ResolveTarget::Author(author) => {
            matches!(token, Token::Author).then(|| author.nicename.clone())
        }
        ResolveTarget::Date(bucket) => match token {
            Token::Year => Some(format!("{:04}", bucket.year)),
            Token::MonthNum => bucket.month.map(|m| format!("{m:02}")),
            Token::Day => bucket.day.map(|d| format!("{d:02}")),
            _ => None,
        },
        ResolveTarget::Search(query) => matches!(token, Token::Search).then(|| query.to_string()),
    }
}

fn entity_value(token: &Token, entity: &Entity, ctx: &ResolveContext<'_>) -> Option<String> {
    let date = || DateTimeUtc::from_unix_with_offset(entity.published, ctx.offset);
    let value = match token {
        Token::Year => format!("{:04}", date().year),
        Token::MonthNum => format!("{:02}", date().month),
        Token::Day => format!("{:02}", date().day),
        Token::Hour => format!("{:02}", date().hour),
        Token::Minute => format!("{:02}", date().minute),
        Token::Second => format!("{:02}", date().second),
        Token::PostId => entity.id.to_string(),
        Token::PostName if ctx.leave_name => return None,
        Token::PostName => entity_slug(entity, ctx),
        Token::PageName if ctx.leave_name => return None,
        Token::PageName => entity_path(entity, ctx),
        Token::Category => category_path(entity, ctx),
        Token::Author => entity
            .author
            .and_then(|id| ctx.store.get_author(id))
            .map(|a| a.nicename)
            .unwrap_or_default(),
        Token::Named(name) if *name == entity.kind.as_str() => {
            if ctx.leave_name {
                return None;
            }
            if ctx.hierarchical {
                entity_path(entity, ctx)
            } else {
                entity_slug(entity, ctx)
            }
        }
        Token::Tag | Token::Search | Token::Named(_) => return None,
    };
    Some(value)
}

/// Stored slug, else the id. Sample mode first tries a slug derived from
/// the title, since unsaved drafts have none yet.
fn entity_slug(entity: &Entity, ctx: &ResolveContext<'_>) -> String {
    if !entity.slug.is_empty() {
        return entity.slug.clone();
    }
    let from_title = if ctx.sample {
        slugify(&entity.title, ctx.slug)
    } else {
        String::new()
    };
    if from_title.is_empty() {
        entity.id.to_string()
    } else {
        from_title
    }
}

/// `grand/parent/child`. A parent cycle is cut at the first repeat.
fn entity_path(entity: &Entity, ctx: &ResolveContext<'_>) -> String {
    let mut slugs = vec![entity_slug(entity, ctx)];
    let mut seen = FxHashSet::default();
    seen.insert(entity.id);

    let mut parent = entity.parent;
    while let Some(id) = parent {
        if !seen.insert(id) {
            break;
        }
        let Some(ancestor) = ctx.store.get_entity(id) else {
            break;
        };
        slugs.push(entity_slug(&ancestor, ctx));
        parent = ancestor.parent;
    }

    slugs.reverse();
    slugs.join("/")
}

/// Hierarchical term slug path, `parent/child`.
pub fn term_path(term: &Term, store: &dyn EntityStore) -> String {
    let mut slugs = vec![term.slug.clone()];
    let mut seen = FxHashSet::default();
    seen.insert(term.id);

    let mut parent = term.parent;
    while let Some(id) = parent {
        if !seen.insert(id) {
            break;
        }
        let Some(ancestor) = store.get_term(id) else {
            break;
        };
        slugs.push(ancestor.slug.clone());
        parent = ancestor.parent;
    }

    slugs.reverse();
    slugs.join("/")
}

fn category_path(entity: &Entity, ctx: &ResolveContext<'_>) -> String {
    let terms = ctx.store.object_terms(entity.id, CATEGORY).unwrap_or_else(|e| {
        debug!("link"; "category lookup for #{} failed: {}", entity.id, e);
        Vec::new()
    });

    let term = match terms.into_iter().next() {
        Some(term) => Some(term),
        None => ctx.default_category.and_then(|id| ctx.store.get_term(id)),
    };
    term.map(|t| term_path(&t, ctx.store)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{EntityKind, MemoryStore, Status};

    /// 2024-06-15T14:30:45Z
    const JUNE_15: i64 = 1_718_461_845;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_term(Term::new(1, CATEGORY, "uncategorized"));
        store.insert_term(Term::new(2, CATEGORY, "news"));
        store.insert_term(Term::new(3, CATEGORY, "rust").with_parent(2));
        store.insert_author(Author::new(9, "alice"));
        store
    }

    fn ctx<'a>(store: &'a MemoryStore, slug: &'a SlugConfig) -> ResolveContext<'a> {
        ResolveContext {
            store,
            offset: UtcOffset::UTC,
            default_category: Some(1),
            slug,
            sample: false,
            leave_name: false,
            hierarchical: false,
        }
    }

    fn resolve_entity(pattern: &str, entity: &Entity, ctx: &ResolveContext<'_>) -> String {
        resolve(&RewritePattern::new(pattern), ResolveTarget::Entity(entity), ctx)
    }

    #[test]
    fn test_token_free_pattern_is_identity() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        assert_eq!(resolve_entity("/about/", &post, &ctx(&store, &slug)), "/about/");
    }

    #[test]
    fn test_date_tokens_zero_padded() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        assert_eq!(
            resolve_entity("/%year%/%monthnum%/%day%/%hour%%minute%%second%/", &post, &ctx(&store, &slug)),
            "/2024/06/15/143045/"
        );
    }

    #[test]
    fn test_timezone_shifts_date() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        let mut ctx = ctx(&store, &slug);
        ctx.offset = UtcOffset::parse("+10:00").unwrap();
        assert_eq!(resolve_entity("/%day%/%hour%", &post, &ctx), "/16/00");
    }

    #[test]
    fn test_category_uses_hierarchy() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        store.insert_entity(post.clone());
        store.assign_terms(5, [3]);
        assert_eq!(
            resolve_entity("/%category%/%postname%/", &post, &ctx(&store, &slug)),
            "/news/rust/hello/"
        );
    }

    #[test]
    fn test_category_falls_back_to_default() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        assert_eq!(
            resolve_entity("/%category%/%postname%", &post, &ctx(&store, &slug)),
            "/uncategorized/hello"
        );

        let mut ctx = ctx(&store, &slug);
        ctx.default_category = None;
        assert_eq!(resolve_entity("/%category%/%postname%", &post, &ctx), "//hello");
    }

    #[test]
    fn test_author_token() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15).with_author(9);
        assert_eq!(resolve_entity("/%author%/%post_id%", &post, &ctx(&store, &slug)), "/alice/5");

        let orphan = Entity::new(6, "post", "x", JUNE_15).with_author(404);
        assert_eq!(resolve_entity("/%author%/", &orphan, &ctx(&store, &slug)), "//");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let store = store();
        let slug = SlugConfig::default();
        let post = Entity::new(5, "post", "hello", JUNE_15);
        assert_eq!(
            resolve_entity("/%foo%/%postname%/%tag%", &post, &ctx(&store, &slug)),
            "/%foo%/hello/%tag%"
        );
    }

    #[test]
    fn test_pagename_joins_ancestors() {
        let store = store();
        let slug = SlugConfig::default();
        store.insert_entity(Entity::new(1, "page", "grand", 0));
        store.insert_entity(Entity::new(2, "page", "parent", 0).with_parent(1));
        let child = Entity::new(3, "page", "child", 0).with_parent(2);
        assert_eq!(
            resolve_entity("/%pagename%", &child, &ctx(&store, &slug)),
            "/grand/parent/child"
        );
    }

    #[test]
    fn test_ancestor_cycle_is_cut() {
        let store = store();
        let slug = SlugConfig::default();
        store.insert_entity(Entity::new(1, "page", "a", 0).with_parent(2));
        store.insert_entity(Entity::new(2, "page", "b", 0).with_parent(1));
        let a = store.get_entity(1).unwrap();
        assert_eq!(resolve_entity("/%pagename%", &a, &ctx(&store, &slug)), "/b/a");
    }

    #[test]
    fn test_leave_name_keeps_placeholders() {
        let store = store();
        let slug = SlugConfig::default();
        let mut ctx = ctx(&store, &slug);
        ctx.leave_name = true;
        let post = Entity::new(5, "post", "hello", JUNE_15);
        assert_eq!(
            resolve_entity("/%year%/%postname%/", &post, &ctx),
            "/2024/%postname%/"
        );
        let product = Entity::new(6, EntityKind::Custom("product".into()), "widget", 0);
        assert_eq!(resolve_entity("/shop/%product%", &product, &ctx), "/shop/%product%");
    }

    #[test]
    fn test_custom_kind_token() {
        let store = store();
        let slug = SlugConfig::default();
        let product = Entity::new(6, "product", "widget", 0);
        assert_eq!(
            resolve_entity("/shop/%product%/", &product, &ctx(&store, &slug)),
            "/shop/widget/"
        );
    }

    #[test]
    fn test_hierarchical_kind_token() {
        let store = store();
        let slug = SlugConfig::default();
        store.insert_entity(Entity::new(1, "doc", "guide", 0));
        let child = Entity::new(2, "doc", "install", 0).with_parent(1);

        let mut ctx = ctx(&store, &slug);
        assert_eq!(resolve_entity("/docs/%doc%", &child, &ctx), "/docs/install");
        ctx.hierarchical = true;
        assert_eq!(resolve_entity("/docs/%doc%", &child, &ctx), "/docs/guide/install");
    }

    #[test]
    fn test_empty_slug_uses_title_in_sample_mode() {
        let store = store();
        let slug = SlugConfig::default();
        let draft = Entity::new(7, "post", "", JUNE_15)
            .with_title("Hello World")
            .with_status(Status::Draft);

        let mut ctx = ctx(&store, &slug);
        assert_eq!(resolve_entity("/%postname%/", &draft, &ctx), "/7/");
        ctx.sample = true;
        assert_eq!(resolve_entity("/%postname%/", &draft, &ctx), "/hello-world/");

        let untitled = Entity::new(8, "post", "", JUNE_15);
        assert_eq!(resolve_entity("/%postname%/", &untitled, &ctx), "/8/");
    }

    #[test]
    fn test_out_of_range_timestamps_clamp() {
        let store = store();
        let slug = SlugConfig::default();
        let mut ctx = ctx(&store, &slug);
        ctx.offset = UtcOffset::parse("+01:00").unwrap();

        let late = Entity::new(1, "post", "x", i64::MAX - 10);
        assert_eq!(resolve_entity("/%year%/%monthnum%/", &late, &ctx), "/9999/12/");

        let early = Entity::new(2, "post", "x", -100_000_000_000);
        assert_eq!(resolve_entity("/%year%/%monthnum%/", &early, &ctx), "/0000/01/");
    }

    #[test]
    fn test_term_target() {
        let store = store();
        let slug = SlugConfig::default();
        let rust = store.get_term(3).unwrap();
        let ctx = ctx(&store, &slug);
        assert_eq!(
            resolve(&RewritePattern::new("/category/%category%"), ResolveTarget::Term(&rust), &ctx),
            "/category/news/rust"
        );
        let genre = Term::new(20, "genre", "jazz");
        assert_eq!(
            resolve(&RewritePattern::new("/genre/%genre%"), ResolveTarget::Term(&genre), &ctx),
            "/genre/jazz"
        );
    }

    #[test]
    fn test_date_target() {
        let store = store();
        let slug = SlugConfig::default();
        let ctx = ctx(&store, &slug);
        let pattern = RewritePattern::new("/%year%/%monthnum%/%day%");
        assert_eq!(
            resolve(&pattern, ResolveTarget::Date(DateBucket::day(2024, 6, 5)), &ctx),
            "/2024/06/05"
        );
        assert_eq!(DateBucket::month(2024, 6).compact(), "202406");
        assert_eq!(DateBucket::year(2024).compact(), "2024");
        assert_eq!(DateBucket::day(2024, 6, 5).compact(), "20240605");
    }
}
