//! Link assembler: one entry point for every kind of site link.
//!
//! Each request is resolved against its structure (or falls back to the
//! query-string form), joined onto the base URL, slash-normalized and then
//! run through the matching filter hook.

use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::pattern::RewritePattern;
use super::resolve::{DateBucket, ResolveContext, ResolveTarget, resolve};
use super::slash::{ArchiveKind, SlashPolicy};
use super::structure::RewriteStructure;
use crate::config::{SiteConfig, SlugConfig};
use crate::content::{Author, CATEGORY, Entity, EntityId, EntityKind, EntityStore, TAG, Term, TermId};
use crate::hooks::{FilterArgs, HookRegistry, names};
use crate::utils::date::UtcOffset;

/// Unreserved characters stay as they are; everything else is escaped.
const SEARCH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Resolution flags for entity links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveMode {
    /// Pretty link even for unpublished entities (editor preview).
    pub sample: bool,
    /// Keep name tokens as placeholders (editable slug UI).
    pub leave_name: bool,
}

impl ResolveMode {
    pub const SAMPLE: Self = Self {
        sample: true,
        leave_name: false,
    };
}

/// Everything a site can link to.
#[derive(Debug, Clone, Copy)]
pub enum LinkRequest<'a> {
    Home,
    Entity { entity: &'a Entity, mode: ResolveMode },
    Shortlink(&'a Entity),
    Year(u16),
    Month(u16, u8),
    Day(u16, u8, u8),
    /// Site feed. `comments` selects the comments feed.
    Feed { feed: Option<&'a str>, comments: bool },
    /// Comments feed of one entity.
    EntityFeed { entity: &'a Entity, feed: Option<&'a str> },
    Term(&'a Term),
    TermFeed { term: &'a Term, feed: Option<&'a str> },
    Author(&'a Author),
    AuthorFeed { author: &'a Author, feed: Option<&'a str> },
    Search(&'a str),
    SearchFeed { query: &'a str, feed: Option<&'a str> },
    PostTypeArchive(&'a EntityKind),
    PostTypeFeed { kind: &'a EntityKind, feed: Option<&'a str> },
    /// Page `page` of the archive at site-relative `path`.
    Paged { path: &'a str, page: u32 },
}

impl<'a> LinkRequest<'a> {
    pub fn entity(entity: &'a Entity) -> Self {
        Self::Entity {
            entity,
            mode: ResolveMode::default(),
        }
    }
}

/// Join `path` onto `base_url` with exactly one slash and normalize it.
///
/// Query-string paths (`?p=5`) are joined as `base/?p=5` and left alone.
pub fn assemble(base_url: &str, path: &str, policy: &SlashPolicy, kind: ArchiveKind) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('?') {
        return format!("{base}/{path}");
    }
    let joined = format!("{base}/{}", path.trim_start_matches('/'));
    policy.apply(&joined, kind)
}

pub struct LinkAssembler {
    base_url: String,
    structure: RewriteStructure,
    policy: SlashPolicy,
    offset: UtcOffset,
    default_category: Option<TermId>,
    front_page: Option<EntityId>,
    slug: SlugConfig,
    hooks: Arc<HookRegistry>,
    store: Arc<dyn EntityStore>,
}

impl LinkAssembler {
    pub fn new(config: &SiteConfig, store: Arc<dyn EntityStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            base_url: config.site.base_url(),
            structure: RewriteStructure::from_config(&config.permalink),
            policy: config.permalink.slash_policy(),
            offset: config.site.offset(),
            default_category: config.permalink.default_category,
            front_page: config.site.front_page,
            slug: config.slug.clone(),
            hooks,
            store,
        }
    }

    pub fn structure(&self) -> &RewriteStructure {
        &self.structure
    }

    pub fn hooks(&self) -> &Arc<HookRegistry> {
        &self.hooks
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &SlashPolicy {
        &self.policy
    }

    /// [`assemble`] with this site's base URL and slash policy.
    pub fn assemble(&self, path: &str, kind: ArchiveKind) -> String {
        assemble(&self.base_url, path, &self.policy, kind)
    }

    /// Build the link for `request`. `None` when the subject has no link
    /// (unknown taxonomy, post type without archive, ...).
    pub fn link(&self, request: LinkRequest<'_>) -> Option<String> {
        match request {
            LinkRequest::Home => Some(self.home_url()),
            LinkRequest::Entity { entity, mode } => Some(self.entity_link(entity, mode)),
            LinkRequest::Shortlink(entity) => Some(self.shortlink(entity)),
            LinkRequest::Year(year) => Some(self.date_link(DateBucket::year(year))),
            LinkRequest::Month(year, month) => Some(self.date_link(DateBucket::month(year, month))),
            LinkRequest::Day(year, month, day) => {
                Some(self.date_link(DateBucket::day(year, month, day)))
            }
            LinkRequest::Feed { feed, comments } => Some(self.feed_link(feed, comments)),
            LinkRequest::EntityFeed { entity, feed } => Some(self.entity_feed_link(entity, feed)),
            LinkRequest::Term(term) => self.term_link(term),
            LinkRequest::TermFeed { term, feed } => self.term_feed_link(term, feed),
            LinkRequest::Author(author) => Some(self.author_link(author)),
            LinkRequest::AuthorFeed { author, feed } => Some(self.author_feed_link(author, feed)),
            LinkRequest::Search(query) => Some(self.search_link(query)),
            LinkRequest::SearchFeed { query, feed } => Some(self.search_feed_link(query, feed)),
            LinkRequest::PostTypeArchive(kind) => self.post_type_archive_link(kind),
            LinkRequest::PostTypeFeed { kind, feed } => self.post_type_feed_link(kind, feed),
            LinkRequest::Paged { path, page } => Some(self.paged_link(path, page)),
        }
    }

    // ========================================================================
    // entities
    // ========================================================================

    fn home_url(&self) -> String {
        let url = format!("{}/", self.base_url);
        self.filter(names::HOME_URL, url, &FilterArgs::new("home"))
    }

    /// Whether `entity` gets a structure-based link or its query fallback.
    fn is_pretty(&self, entity: &Entity, mode: ResolveMode) -> bool {
        if self.structure.is_plain() || (entity.status.is_unpublished() && !mode.sample) {
            return false;
        }
        match &entity.kind {
            EntityKind::Custom(name) => self.structure.post_type(name).is_some(),
            EntityKind::Post | EntityKind::Page => true,
        }
    }

    fn is_front_page(&self, entity: &Entity) -> bool {
        entity.kind.is_page() && self.front_page == Some(entity.id)
    }

    fn entity_link(&self, entity: &Entity, mode: ResolveMode) -> String {
        let pretty = self.is_pretty(entity, mode);
        let (hook, kind_name) = match &entity.kind {
            EntityKind::Post => (names::POST_LINK, "post"),
            EntityKind::Page => (names::PAGE_LINK, "page"),
            EntityKind::Custom(_) => (names::POST_TYPE_LINK, "post_type"),
        };

        let url = if self.is_front_page(entity) {
            format!("{}/", self.base_url)
        } else if pretty {
            let (pattern, kind, hierarchical) = match &entity.kind {
                EntityKind::Post => (self.structure.permalink(), ArchiveKind::Single, false),
                EntityKind::Page => (self.structure.page(), ArchiveKind::Page, false),
                EntityKind::Custom(name) => match self.structure.post_type(name) {
                    Some(pt) => (&pt.single, ArchiveKind::Single, pt.hierarchical),
                    None => (self.structure.permalink(), ArchiveKind::Single, false),
                },
            };
            let ctx = self.context(mode, hierarchical);
            self.assemble(&resolve(pattern, ResolveTarget::Entity(entity), &ctx), kind)
        } else {
            self.assemble(&format!("?{}", entity_query(entity)), ArchiveKind::Single)
        };

        let args = FilterArgs::new(kind_name)
            .entity(entity.id)
            .flags(mode.sample, mode.leave_name);
        self.filter(hook, url, &args)
    }

    fn shortlink(&self, entity: &Entity) -> String {
        let url = if self.is_front_page(entity) {
            format!("{}/", self.base_url)
        } else if entity.kind.is_page() {
            self.assemble(&format!("?page_id={}", entity.id), ArchiveKind::Single)
        } else {
            self.assemble(&format!("?p={}", entity.id), ArchiveKind::Single)
        };
        self.filter(names::SHORTLINK, url, &FilterArgs::new("shortlink").entity(entity.id))
    }

    fn entity_feed_link(&self, entity: &Entity, feed: Option<&str>) -> String {
        let feed = self.feed_name(feed);
        let url = if self.is_pretty(entity, ResolveMode::default()) {
            let permalink = self.entity_link(entity, ResolveMode::default());
            self.append(&permalink, &self.feed_path(feed), ArchiveKind::SingleFeed)
        } else {
            self.assemble(
                &format!("?feed={feed}&{}", entity_query(entity)),
                ArchiveKind::SingleFeed,
            )
        };
        let args = FilterArgs::new("entity_feed").entity(entity.id).feed(feed);
        self.filter(names::POST_COMMENTS_FEED_LINK, url, &args)
    }

    // ========================================================================
    // archives
    // ========================================================================

    fn date_link(&self, bucket: DateBucket) -> String {
        let (hook, kind, pattern) = match (bucket.month, bucket.day) {
            (Some(_), Some(_)) => (names::DAY_LINK, ArchiveKind::Day, self.structure.date()),
            (Some(_), None) => (names::MONTH_LINK, ArchiveKind::Month, self.structure.month()),
            (None, _) => (names::YEAR_LINK, ArchiveKind::Year, self.structure.year()),
        };

        let url = if self.structure.is_plain() {
            self.assemble(&format!("?m={}", bucket.compact()), kind)
        } else {
            self.resolve_assemble(pattern, ResolveTarget::Date(bucket), kind)
        };
        self.filter(hook, url, &FilterArgs::new(kind.as_str()))
    }

    fn feed_link(&self, feed: Option<&str>, comments: bool) -> String {
        let feed = self.feed_name(feed);
        let url = if self.structure.is_plain() {
            let prefix = if comments { "comments-" } else { "" };
            self.assemble(&format!("?feed={prefix}{feed}"), ArchiveKind::Feed)
        } else {
            let mut path = String::new();
            if comments {
                path.push_str(&self.structure.comments_base);
                path.push('/');
            }
            path.push_str(&self.feed_path(feed));
            self.assemble(&path, ArchiveKind::Feed)
        };
        self.filter(names::FEED_LINK, url, &FilterArgs::new("feed").feed(feed))
    }

    fn term_link(&self, term: &Term) -> Option<String> {
        if !self.store.taxonomy_exists(&term.taxonomy) {
            return None;
        }
        let kind = match term.taxonomy.as_str() {
            CATEGORY => ArchiveKind::Category,
            TAG => ArchiveKind::Tag,
            _ => ArchiveKind::Term,
        };
        let url = if self.structure.is_plain() {
            self.assemble(&format!("?{}", term_query(term)), kind)
        } else {
            let pattern = self.structure.term(&term.taxonomy);
            self.resolve_assemble(&pattern, ResolveTarget::Term(term), kind)
        };
        Some(self.filter(names::TERM_LINK, url, &FilterArgs::new("term").term(term.id)))
    }

    fn term_feed_link(&self, term: &Term, feed: Option<&str>) -> Option<String> {
        let link = self.term_link(term)?;
        let feed = self.feed_name(feed);
        let url = if self.structure.is_plain() {
            self.assemble(&format!("?{}&feed={feed}", term_query(term)), ArchiveKind::Feed)
        } else {
            self.append(&link, &self.feed_path(feed), ArchiveKind::Feed)
        };
        let args = FilterArgs::new("term_feed").term(term.id).feed(feed);
        Some(self.filter(names::TERM_FEED_LINK, url, &args))
    }

    fn author_link(&self, author: &Author) -> String {
        let url = if self.structure.is_plain() {
            self.assemble(&format!("?author={}", author.id), ArchiveKind::Author)
        } else {
            self.resolve_assemble(
                self.structure.author(),
                ResolveTarget::Author(author),
                ArchiveKind::Author,
            )
        };
        self.filter(names::AUTHOR_LINK, url, &FilterArgs::new("author").author(author.id))
    }

    fn author_feed_link(&self, author: &Author, feed: Option<&str>) -> String {
        let feed = self.feed_name(feed);
        let url = if self.structure.is_plain() {
            self.assemble(&format!("?author={}&feed={feed}", author.id), ArchiveKind::Feed)
        } else {
            let link = self.author_link(author);
            self.append(&link, &self.feed_path(feed), ArchiveKind::Feed)
        };
        let args = FilterArgs::new("author_feed").author(author.id).feed(feed);
        self.filter(names::AUTHOR_FEED_LINK, url, &args)
    }

    fn search_link(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, SEARCH).to_string();
        let url = if self.structure.is_plain() {
            self.assemble(&format!("?s={encoded}"), ArchiveKind::Search)
        } else {
            self.resolve_assemble(
                self.structure.search(),
                ResolveTarget::Search(&encoded),
                ArchiveKind::Search,
            )
        };
        self.filter(names::SEARCH_LINK, url, &FilterArgs::new("search").query(query))
    }

    fn search_feed_link(&self, query: &str, feed: Option<&str>) -> String {
        let feed = self.feed_name(feed);
        let url = if self.structure.is_plain() {
            let encoded = utf8_percent_encode(query, SEARCH);
            self.assemble(&format!("?s={encoded}&feed={feed}"), ArchiveKind::Feed)
        } else {
            let link = self.search_link(query);
            self.append(&link, &self.feed_path(feed), ArchiveKind::Feed)
        };
        let args = FilterArgs::new("search_feed").query(query).feed(feed);
        self.filter(names::SEARCH_FEED_LINK, url, &args)
    }

    fn post_type_archive_link(&self, kind: &EntityKind) -> Option<String> {
        let url = match kind {
            EntityKind::Post => format!("{}/", self.base_url),
            EntityKind::Page => return None,
            EntityKind::Custom(name) => {
                let archive = self.structure.post_type(name)?.archive.as_deref()?;
                if self.structure.is_plain() {
                    self.assemble(&format!("?post_type={name}"), ArchiveKind::PostTypeArchive)
                } else {
                    self.assemble(archive, ArchiveKind::PostTypeArchive)
                }
            }
        };
        let args = FilterArgs::new("post_type_archive");
        Some(self.filter(names::POST_TYPE_ARCHIVE_LINK, url, &args))
    }

    fn post_type_feed_link(&self, kind: &EntityKind, feed: Option<&str>) -> Option<String> {
        let feed = self.feed_name(feed);
        let url = match kind {
            EntityKind::Post => self.feed_link(Some(feed), false),
            EntityKind::Page => return None,
            EntityKind::Custom(name) => {
                let link = self.post_type_archive_link(kind)?;
                if self.structure.is_plain() {
                    self.assemble(&format!("?post_type={name}&feed={feed}"), ArchiveKind::Feed)
                } else {
                    self.append(&link, &self.feed_path(feed), ArchiveKind::Feed)
                }
            }
        };
        let args = FilterArgs::new("post_type_feed").feed(feed);
        Some(self.filter(names::POST_TYPE_ARCHIVE_FEED_LINK, url, &args))
    }

    fn paged_link(&self, path: &str, page: u32) -> String {
        let url = if page <= 1 {
            self.assemble(path, ArchiveKind::Paged)
        } else {
            let (head, tail) = split_query(path);
            if self.structure.is_plain() {
                let sep = if tail.starts_with('?') { '&' } else { '?' };
                let base = if head.trim_matches('/').is_empty() {
                    format!("{}/", self.base_url)
                } else {
                    self.assemble(head, ArchiveKind::Paged)
                };
                format!("{base}{tail}{sep}paged={page}")
            } else {
                let head = head.trim_end_matches('/');
                let base = &self.structure.pagination_base;
                self.assemble(&format!("{head}/{base}/{page}{tail}"), ArchiveKind::Paged)
            }
        };
        self.filter(names::PAGENUM_LINK, url, &FilterArgs::new("paged").page(page))
    }

    // ========================================================================
    // helpers
    // ========================================================================

    fn context(&self, mode: ResolveMode, hierarchical: bool) -> ResolveContext<'_> {
        ResolveContext {
            store: self.store.as_ref(),
            offset: self.offset,
            default_category: self.default_category,
            slug: &self.slug,
            sample: mode.sample,
            leave_name: mode.leave_name,
            hierarchical,
        }
    }

    fn resolve_assemble(
        &self,
        pattern: &RewritePattern,
        target: ResolveTarget<'_>,
        kind: ArchiveKind,
    ) -> String {
        let ctx = self.context(ResolveMode::default(), false);
        self.assemble(&resolve(pattern, target, &ctx), kind)
    }

    fn filter(&self, hook: &str, url: String, args: &FilterArgs) -> String {
        self.hooks.apply_filter(hook, url, args)
    }

    fn feed_name<'f>(&'f self, feed: Option<&'f str>) -> &'f str {
        feed.unwrap_or(&self.structure.default_feed)
    }

    /// `feed` for the default feed kind, `feed/<kind>` otherwise.
    fn feed_path(&self, feed: &str) -> String {
        if self.structure.is_default_feed(feed) {
            self.structure.feed_base.clone()
        } else {
            format!("{}/{feed}", self.structure.feed_base)
        }
    }

    /// Append path segments to an assembled link, keeping its query.
    fn append(&self, link: &str, suffix: &str, kind: ArchiveKind) -> String {
        let (head, tail) = split_query(link);
        let joined = format!("{}/{suffix}{tail}", head.trim_end_matches('/'));
        self.policy.apply(&joined, kind)
    }
}

/// Query fallback identifying an entity (without the leading `?`).
fn entity_query(entity: &Entity) -> String {
    match &entity.kind {
        EntityKind::Post => format!("p={}", entity.id),
        EntityKind::Page => format!("page_id={}", entity.id),
        EntityKind::Custom(name) => format!("post_type={name}&p={}", entity.id),
    }
}

/// Query form of a term archive (without the leading `?`).
fn term_query(term: &Term) -> String {
    match term.taxonomy.as_str() {
        CATEGORY => format!("cat={}", term.id),
        TAG => format!("tag={}", term.slug),
        taxonomy => format!("taxonomy={taxonomy}&term={}", term.slug),
    }
}

fn split_query(path: &str) -> (&str, &str) {
    let split = path.find(['?', '#']).unwrap_or(path.len());
    path.split_at(split)
}
