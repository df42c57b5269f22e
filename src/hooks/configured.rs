//! Filters declared in `[[filters]]`.

use regex::Regex;

use super::HookRegistry;
use crate::config::FilterConfig;
use crate::debug;

/// Register every enabled entry of `filters` on `registry`.
///
/// Returns how many were registered.
pub fn register_configured(
    registry: &HookRegistry,
    filters: &[FilterConfig],
) -> Result<usize, regex::Error> {
    let mut count = 0;
    for filter in filters.iter().filter(|f| f.enable) {
        let find = Regex::new(&filter.find)?;
        let replace = filter.replace.clone();
        registry.register_filter_with_priority(&filter.hook, filter.priority, move |value, _| {
            find.replace_all(&value, replace.as_str()).into_owned()
        });
        debug!("hook"; "{} registered on {} (priority {})", filter.display_name(), filter.hook, filter.priority);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{FilterArgs, names};

    fn filter(hook: &str, find: &str, replace: &str) -> FilterConfig {
        FilterConfig {
            hook: hook.into(),
            find: find.into(),
            replace: replace.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rewrites_matching_links() {
        let registry = HookRegistry::new();
        let filters = [filter(names::POST_LINK, r"^https://example\.com/", "https://cdn.example.com/")];
        assert_eq!(register_configured(&registry, &filters).unwrap(), 1);

        let out = registry.apply_filter(
            names::POST_LINK,
            "https://example.com/hello/".into(),
            &FilterArgs::new("post"),
        );
        assert_eq!(out, "https://cdn.example.com/hello/");
        assert!(!registry.has_filter(names::TERM_LINK));
    }

    #[test]
    fn test_capture_groups_and_priority() {
        let registry = HookRegistry::new();
        let filters = [
            FilterConfig {
                priority: 20,
                ..filter(names::TERM_LINK, "$", "#terms")
            },
            filter(names::TERM_LINK, r"/category/(\w+)/", "/topics/$1/"),
        ];
        register_configured(&registry, &filters).unwrap();

        let out = registry.apply_filter(
            names::TERM_LINK,
            "https://example.com/category/news/".into(),
            &FilterArgs::new("term"),
        );
        assert_eq!(out, "https://example.com/topics/news/#terms");
    }

    #[test]
    fn test_disabled_filters_skipped() {
        let registry = HookRegistry::new();
        let filters = [FilterConfig {
            enable: false,
            find: "(".into(),
            ..filter(names::POST_LINK, "", "")
        }];
        assert_eq!(register_configured(&registry, &filters).unwrap(), 0);
        assert!(!registry.has_filter(names::POST_LINK));
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let registry = HookRegistry::new();
        assert!(register_configured(&registry, &[filter(names::POST_LINK, "(", "")]).is_err());
    }
}
