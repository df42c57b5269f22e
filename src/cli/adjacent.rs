//! `adjacent` command.

use std::sync::Arc;

use anyhow::Result;

use super::args::AdjacentArgs;
use super::common::Session;
use crate::adjacent::{AdjacencyConstraints, AdjacentQuery, Boundary, Direction, MemoryCache};
use crate::content::Viewer;
use crate::permalink::LinkRequest;

enum Target {
    Adjacent(Direction),
    Boundary(Boundary),
}

impl Target {
    fn from_args(args: &AdjacentArgs) -> Self {
        if args.first {
            Self::Boundary(Boundary::First)
        } else if args.last {
            Self::Boundary(Boundary::Last)
        } else if args.previous {
            Self::Adjacent(Direction::Previous)
        } else {
            Self::Adjacent(Direction::Next)
        }
    }
}

/// Print the adjacent link, or nothing when there is none.
pub fn run_adjacent(args: &AdjacentArgs, session: &Session) -> Result<()> {
    let current = session.entity(args.id)?;
    let constraints = AdjacencyConstraints {
        same_term: args.same_term,
        excluded_terms: args.exclude.iter().copied().collect(),
        taxonomy: args.taxonomy.clone(),
    };
    let viewer = Viewer {
        user: args.user,
        read_private: args.read_private,
    };
    let query = AdjacentQuery::new(session.store.clone(), Arc::new(MemoryCache::new()));

    let link = match Target::from_args(args) {
        Target::Adjacent(direction) => {
            query.adjacent_link(&session.links, &current, direction, &constraints, viewer)?
        }
        Target::Boundary(boundary) => query
            .find_boundary(&current, boundary, &constraints, viewer)?
            .and_then(|e| session.links.link(LinkRequest::entity(&e))),
    };

    if let Some(link) = link {
        println!("{link}");
    }
    Ok(())
}
