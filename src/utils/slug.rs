//! Title to slug conversion.
//!
//! Used when an entity has no stored slug (sample permalinks for unsaved
//! drafts) and the slug must be derived from its title.

use deunicode::deunicode;

use crate::config::SlugConfig;

/// Convert arbitrary text into a single URL path segment.
///
/// Keeps letters and digits; every other run of characters
/// becomes one separator. Without transliteration non-ASCII letters survive
/// and are percent-encoded later by the URL consumer.
pub fn slugify(text: &str, config: &SlugConfig) -> String {
    let sep = config.separator.as_char();
    let source = if config.transliterate {
        deunicode(text)
    } else {
        text.to_string()
    };

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in source.chars() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut slug = String::with_capacity(source.len());
    let mut len = 0;
    for word in &words {
        let extra = word.chars().count() + usize::from(!slug.is_empty());
        if len + extra > config.max_length {
            if slug.is_empty() {
                // A single overlong word is cut mid-word.
                slug.extend(word.chars().take(config.max_length));
            }
            break;
        }
        if !slug.is_empty() {
            slug.push(sep);
        }
        slug.push_str(word);
        len += extra;
    }

    if config.lowercase {
        slug.to_lowercase()
    } else {
        slug
    }
}
