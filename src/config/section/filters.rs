//! `[[filters]]` section: regex rewrites applied to generated links.
//!
//! Each entry is registered on its hook when a session opens and takes its
//! place in the chain by `priority`, next to filters registered in code.
//!
//! ```toml
//! [[filters]]
//! hook = "post_link"
//! find = "^https://example\\.com/"
//! replace = "https://cdn.example.com/"
//!
//! [[filters]]
//! name = "utm"
//! hook = "feed_link"
//! find = "$"
//! replace = "?utm_source=feed"
//! priority = 20
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::hooks::{DEFAULT_PRIORITY, names};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    pub enable: bool,
    /// Display name for logging (defaults to the hook name).
    pub name: Option<String>,
    /// Hook to attach to (`post_link`, `term_link`, ...).
    pub hook: String,
    /// Regex matched against the link.
    pub find: String,
    /// Replacement, `$1` / `${name}` expand capture groups.
    pub replace: String,
    pub priority: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enable: true,
            name: None,
            hook: String::new(),
            find: String::new(),
            replace: String::new(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

impl FilterConfig {
    pub const HOOK: FieldPath = FieldPath::new("filters.hook");
    pub const FIND: FieldPath = FieldPath::new("filters.find");

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.hook)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.hook.is_empty() {
            diag.error(Self::HOOK, "filter has no hook");
        } else if !names::ALL.contains(&self.hook.as_str()) {
            diag.error_with_hint(
                Self::HOOK,
                format!("unknown hook `{}`", self.hook),
                format!("available hooks: {}", names::ALL.join(", ")),
            );
        }
        if let Err(e) = Regex::new(&self.find) {
            diag.error(
                Self::FIND,
                format!("`{}` is not a valid regex: {e}", self.display_name()),
            );
        }
    }
}
