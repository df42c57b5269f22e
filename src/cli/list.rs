//! `list` command.
//!
//! Resolves every entity an anonymous visitor can see, in parallel.

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;

use super::common::Session;
use crate::content::{Entity, EntityId, Viewer};
use crate::log;
use crate::permalink::LinkRequest;
use crate::utils::date::DateTimeUtc;

/// One listed entity.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub id: EntityId,
    pub kind: String,
    /// RFC 3339, UTC.
    pub published: String,
    pub url: String,
    #[serde(skip)]
    timestamp: i64,
}

pub fn run_list(json: bool, session: &Session) -> Result<()> {
    let entities = session.store.all_entities();
    let entries = collect(&entities, session);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}\t{}\t{}", entry.id, entry.kind, entry.url);
        }
    }
    log!("list"; "resolved {} of {} entities", entries.len(), entities.len());
    Ok(())
}

/// Newest first; equal timestamps keep store order.
fn collect(entities: &[Entity], session: &Session) -> Vec<ListEntry> {
    let mut entries: Vec<ListEntry> = entities
        .par_iter()
        .filter(|e| Viewer::ANONYMOUS.can_see(e))
        .filter_map(|e| {
            let url = session.links.link(LinkRequest::entity(e))?;
            Some(ListEntry {
                id: e.id,
                kind: e.kind.to_string(),
                published: DateTimeUtc::from_unix(e.published).to_rfc3339(),
                url,
                timestamp: e.published,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}
