//! `link` command.

use anyhow::Result;

use super::args::LinkArgs;
use super::common::{Session, print_link};
use crate::permalink::{LinkRequest, ResolveMode};

pub fn run_link(args: &LinkArgs, session: &Session) -> Result<()> {
    let entity = session.entity(args.id)?;
    let request = if args.short {
        LinkRequest::Shortlink(&entity)
    } else {
        LinkRequest::Entity {
            entity: &entity,
            mode: ResolveMode {
                sample: args.sample,
                leave_name: args.leave_name,
            },
        }
    };
    print_link(session.links.link(request), || format!("entity {}", args.id))
}
