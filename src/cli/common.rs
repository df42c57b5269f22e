//! Shared command plumbing: store loading and lookups.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::config::SiteConfig;
use crate::content::{Author, AuthorId, Entity, EntityId, EntityStore, MemoryStore, Term, TermId};
use crate::hooks::{HookRegistry, register_configured};
use crate::permalink::LinkAssembler;
use crate::{debug, log};

/// Everything a command needs to build links.
pub struct Session {
    pub store: Arc<dyn EntityStore>,
    pub hooks: Arc<HookRegistry>,
    pub links: LinkAssembler,
}

impl Session {
    /// Load the content store named by `[store].path`.
    pub fn open(config: &SiteConfig) -> Result<Self> {
        Self::with_hooks(config, Arc::new(HookRegistry::new()))
    }

    /// Like [`Session::open`], on a registry that may already carry filters.
    /// `[[filters]]` entries are added to it.
    pub fn with_hooks(config: &SiteConfig, hooks: Arc<HookRegistry>) -> Result<Self> {
        let path = &config.store.path;
        let store = if path.exists() {
            let store = MemoryStore::load(path)
                .with_context(|| format!("failed to load content store {}", path.display()))?;
            debug!("store"; "loaded {} entities from {}", store.len(), path.display());
            store
        } else {
            log!("warning"; "content store {} not found, using an empty store", path.display());
            MemoryStore::new()
        };

        let registered = register_configured(&hooks, &config.filters)
            .context("invalid [[filters]] entry")?;
        if registered > 0 {
            debug!("hook"; "{} configured filters", registered);
        }

        let store: Arc<dyn EntityStore> = Arc::new(store);
        let links = LinkAssembler::new(config, store.clone(), hooks.clone());
        Ok(Self { store, hooks, links })
    }

    pub fn entity(&self, id: EntityId) -> Result<Entity> {
        self.store
            .get_entity(id)
            .ok_or_else(|| anyhow!("entity {id} not found"))
    }

    pub fn term(&self, id: TermId) -> Result<Term> {
        self.store
            .get_term(id)
            .ok_or_else(|| anyhow!("term {id} not found"))
    }

    pub fn author(&self, id: AuthorId) -> Result<Author> {
        self.store
            .get_author(id)
            .ok_or_else(|| anyhow!("author {id} not found"))
    }
}

/// Print a link, or fail when nothing links to the request.
pub fn print_link(link: Option<String>, what: impl FnOnce() -> String) -> Result<()> {
    let link = link.ok_or_else(|| anyhow!("{} has no link", what()))?;
    println!("{link}");
    Ok(())
}
