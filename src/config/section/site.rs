//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com/blog"
//! timezone = "+08:00"
//! front_page = 7
//! ```

use serde::{Deserialize, Serialize};

use crate::config::util::normalize_base_url;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::content::EntityId;
use crate::utils::date::UtcOffset;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Base URL every link is built on, path used as prefix.
    pub url: Option<String>,

    /// Fixed UTC offset for date tokens (`+08:00`).
    pub timezone: String,

    /// Page served at the site root. Its link is the home URL.
    pub front_page: Option<EntityId>,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            timezone: "+00:00".into(),
            front_page: None,
        }
    }
}

impl SiteSectionConfig {
    pub const URL: FieldPath = FieldPath::new("site.url");
    pub const TIMEZONE: FieldPath = FieldPath::new("site.timezone");

    /// Base URL without trailing slash. Empty when unset or invalid.
    pub fn base_url(&self) -> String {
        self.url
            .as_deref()
            .and_then(normalize_base_url)
            .unwrap_or_default()
    }

    /// Parsed offset, UTC when invalid (validation reports it).
    pub fn offset(&self) -> UtcOffset {
        UtcOffset::parse(&self.timezone).unwrap_or(UtcOffset::UTC)
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` is set and is an absolute http(s) URL with a host
    /// - `url` carries no query or fragment
    /// - `timezone` is `±HH:MM` within ±14:00
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match &self.url {
            None => diag.error_with_hint(
                Self::URL,
                "base URL is not configured",
                format!("set {}, e.g.: \"https://example.com\"", Self::URL),
            ),
            Some(url_str) => Self::validate_url(url_str, diag),
        }

        if UtcOffset::parse(&self.timezone).is_none() {
            diag.error_with_hint(
                Self::TIMEZONE,
                format!("invalid UTC offset '{}'", self.timezone),
                "use format like +08:00 or -05:30, within ±14:00",
            );
        }
    }

    fn validate_url(url_str: &str, diag: &mut ConfigDiagnostics) {
        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::URL,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::URL,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
                if parsed.query().is_some() || parsed.fragment().is_some() {
                    diag.error(Self::URL, "base URL must not carry a query or fragment");
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::URL,
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn errors_for(extra: &str) -> usize {
        let config = test_parse_config(extra);
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        diag.len()
    }

    #[test]
    fn test_defaults() {
        let config = SiteSectionConfig::default();
        assert_eq!(config.offset(), UtcOffset::UTC);
        assert!(config.front_page.is_none());
        assert_eq!(config.base_url(), "");
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = test_parse_config("[site]\nurl = \"https://Example.com/blog/\"");
        assert_eq!(config.site.base_url(), "https://example.com/blog");
    }

    #[test]
    fn test_valid_site() {
        assert_eq!(
            errors_for("[site]\nurl = \"https://example.com\"\ntimezone = \"-05:30\""),
            0
        );
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(errors_for("[site]\ntimezone = \"+08:00\""), 1);
    }

    #[test]
    fn test_bad_scheme_and_query() {
        assert_eq!(errors_for("[site]\nurl = \"ftp://example.com\""), 1);
        assert_eq!(errors_for("[site]\nurl = \"https://example.com/?a=1\""), 1);
        assert_eq!(errors_for("[site]\nurl = \"not a url\""), 1);
    }

    #[test]
    fn test_bad_timezone() {
        assert_eq!(
            errors_for("[site]\nurl = \"https://example.com\"\ntimezone = \"+15:00\""),
            1
        );
        assert_eq!(
            errors_for("[site]\nurl = \"https://example.com\"\ntimezone = \"8\""),
            1
        );
    }
}
