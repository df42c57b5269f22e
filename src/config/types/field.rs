//! Config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, as written in `permalink.toml`.
///
/// Sections expose their paths as associated constants:
///
/// ```ignore
/// impl SiteSectionConfig {
///     pub const URL: FieldPath = FieldPath::new("site.url");
/// }
///
/// diag.error(SiteSectionConfig::URL, "required");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Top-level table: `permalink` for `permalink.post_types`.
    pub fn section(self) -> &'static str {
        self.0.split_once('.').map_or(self.0, |(section, _)| section)
    }

    /// Everything below the section: `post_types` for `permalink.post_types`.
    pub fn key(self) -> &'static str {
        self.0.split_once('.').map_or("", |(_, key)| key)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
