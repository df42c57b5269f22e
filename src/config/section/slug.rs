//! `[slug]` section: how a slug is derived from a title.
//!
//! Only consulted when an entity has no stored slug and a sample permalink
//! is requested.
//!
//! ```toml
//! [slug]
//! transliterate = true
//! separator = "underscore"
//! max_length = 80
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Longest slug a stored entity can carry.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Word separator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugSeparator {
    #[default]
    Dash,
    Underscore,
}

impl SlugSeparator {
    pub const fn as_char(self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SlugConfig {
    /// Fold accented and non-Latin text to ASCII (`Crème` -> `creme`).
    pub transliterate: bool,
    pub separator: SlugSeparator,
    pub lowercase: bool,
    /// Truncate at a word boundary when longer (in chars).
    pub max_length: usize,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            transliterate: true,
            separator: SlugSeparator::Dash,
            lowercase: true,
            max_length: MAX_SLUG_LENGTH,
        }
    }
}

impl SlugConfig {
    pub const MAX_LENGTH: FieldPath = FieldPath::new("slug.max_length");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_length == 0 || self.max_length > MAX_SLUG_LENGTH {
            diag.error_with_hint(
                Self::MAX_LENGTH,
                format!("{} is out of range", self.max_length),
                format!("use a value between 1 and {MAX_SLUG_LENGTH}"),
            );
        }
    }
}
