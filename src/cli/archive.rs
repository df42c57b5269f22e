//! `archive` command.

use anyhow::Result;

use super::args::{ArchiveTarget, feed_kind};
use super::common::{Session, print_link};
use crate::content::EntityKind;
use crate::permalink::LinkRequest;

pub fn run_archive(target: &ArchiveTarget, session: &Session) -> Result<()> {
    let links = &session.links;
    let link = match target {
        ArchiveTarget::Home => links.link(LinkRequest::Home),
        ArchiveTarget::Year { year } => links.link(LinkRequest::Year(*year)),
        ArchiveTarget::Month { year, month } => links.link(LinkRequest::Month(*year, *month)),
        ArchiveTarget::Day { year, month, day } => {
            links.link(LinkRequest::Day(*year, *month, *day))
        }
        ArchiveTarget::Feed { kind, comments } => links.link(LinkRequest::Feed {
            feed: kind.as_deref(),
            comments: *comments,
        }),
        ArchiveTarget::Term { id, feed } => {
            let term = session.term(*id)?;
            match feed.as_deref() {
                Some(feed) => links.link(LinkRequest::TermFeed {
                    term: &term,
                    feed: feed_kind(Some(feed)),
                }),
                None => links.link(LinkRequest::Term(&term)),
            }
        }
        ArchiveTarget::Author { id, feed } => {
            let author = session.author(*id)?;
            match feed.as_deref() {
                Some(feed) => links.link(LinkRequest::AuthorFeed {
                    author: &author,
                    feed: feed_kind(Some(feed)),
                }),
                None => links.link(LinkRequest::Author(&author)),
            }
        }
        ArchiveTarget::Search { query, feed } => match feed.as_deref() {
            Some(feed) => links.link(LinkRequest::SearchFeed {
                query,
                feed: feed_kind(Some(feed)),
            }),
            None => links.link(LinkRequest::Search(query)),
        },
        ArchiveTarget::Type { kind, feed } => {
            let kind = EntityKind::from(kind.as_str());
            match feed.as_deref() {
                Some(feed) => links.link(LinkRequest::PostTypeFeed {
                    kind: &kind,
                    feed: feed_kind(Some(feed)),
                }),
                None => links.link(LinkRequest::PostTypeArchive(&kind)),
            }
        }
        ArchiveTarget::Paged { path, page } => links.link(LinkRequest::Paged { path, page: *page }),
    };
    print_link(link, || describe(target))
}

fn describe(target: &ArchiveTarget) -> String {
    match target {
        ArchiveTarget::Type { kind, .. } => format!("post type '{kind}'"),
        ArchiveTarget::Term { id, .. } => format!("term {id}"),
        other => format!("{other:?}"),
    }
}
