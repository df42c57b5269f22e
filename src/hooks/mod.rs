//! Filter hooks: the extension point every generated URL passes through.
//!
//! This module provides:
//! - `registry`: [`HookRegistry`], an explicit object injected into the
//!   link assembler (there is no global registry)
//! - `names`: hook names the assembler applies
//! - `configured`: regex filters declared in `[[filters]]`

mod configured;
pub mod names;
mod registry;

pub use configured::register_configured;
pub use registry::{DEFAULT_PRIORITY, Filter, FilterArgs, HookRegistry};
