//! Permalink - canonical URL resolution for content sites.
//!
//! The `permalink` binary is a thin shell over this library. Embedders build
//! a [`hooks::HookRegistry`], register filters on it, and hand it to
//! [`cli::common::Session::with_hooks`] or straight to
//! [`permalink::LinkAssembler::new`].
//!
//! | Module      | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `permalink` | Rewrite structures, token resolution, link assembly |
//! | `hooks`     | Named filter chains every generated URL runs through |
//! | `adjacent`  | Cached previous/next entity lookup                  |
//! | `content`   | Entity model and the store interface                |
//! | `config`    | `permalink.toml` loading and validation             |
//! | `cli`       | Command-line surface                                |

#![allow(dead_code)]

pub mod adjacent;
pub mod cli;
pub mod config;
pub mod content;
pub mod hooks;
pub mod logger;
pub mod permalink;
pub mod utils;
