//! Permalink resolution.
//!
//! This module provides:
//! - `pattern`: [`RewritePattern`], a pre-parsed `%token%` template
//! - `structure`: [`RewriteStructure`], the post structure and its derived
//!   archive variants
//! - `resolve`: token substitution against an entity, term, author or date
//! - `slash`: trailing-slash policy per [`ArchiveKind`]
//! - `assemble`: [`LinkAssembler`], the single entry point for site links

mod assemble;
mod pattern;
mod resolve;
mod slash;
mod structure;

pub use assemble::{LinkAssembler, LinkRequest, ResolveMode, assemble};
pub use pattern::{RewritePattern, Segment, Token};
pub use resolve::{DateBucket, ResolveContext, ResolveTarget, resolve, term_path};
pub use slash::{ArchiveKind, SlashPolicy, normalize};
pub use structure::{PostTypeStructure, RewriteStructure};
