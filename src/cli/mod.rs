//! Command-line interface module.

pub mod adjacent;
pub mod archive;
mod args;
pub mod check;
pub mod common;
pub mod link;
pub mod list;

pub use args::{AdjacentArgs, ArchiveTarget, Cli, Commands, LinkArgs};
