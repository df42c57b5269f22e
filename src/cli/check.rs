//! `check` command: the config was validated on load, so this prints what
//! it derives.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::SiteConfig;
use crate::content::{CATEGORY, TAG};
use crate::log;
use crate::permalink::RewriteStructure;

pub fn run_check(config: &SiteConfig) -> Result<()> {
    let structure = RewriteStructure::from_config(&config.permalink);
    log!("check"; "{} is valid", config.config_path.display());

    for (name, value) in rows(config, &structure) {
        println!("{:<16} {}", name.bold(), value);
    }
    Ok(())
}

fn rows(config: &SiteConfig, structure: &RewriteStructure) -> Vec<(String, String)> {
    let plain = || "(plain)".dimmed().to_string();
    let mut rows = vec![("base url".to_string(), config.site.base_url())];

    if structure.is_plain() {
        rows.push(("structure".into(), plain()));
    } else {
        for (name, pattern) in [
            ("structure", structure.permalink()),
            ("date", structure.date()),
            ("month", structure.month()),
            ("year", structure.year()),
            ("page", structure.page()),
            ("author", structure.author()),
            ("search", structure.search()),
        ] {
            rows.push((name.into(), pattern.to_string()));
        }
        rows.push((CATEGORY.into(), structure.term(CATEGORY).to_string()));
        rows.push((TAG.into(), structure.term(TAG).to_string()));
        rows.push(("feed".into(), format!("/{}/", structure.feed_base)));
        rows.push((
            "pagination".into(),
            format!("<archive>/{}/<n>", structure.pagination_base),
        ));
    }

    let policy = config.permalink.slash_policy();
    rows.push(("trailing slash".into(), policy.trailing.to_string()));
    for (kind, trailing) in &config.permalink.trailing_slash_overrides {
        rows.push((format!("  {}", kind.as_str()), trailing.to_string()));
    }

    for (name, post_type) in structure.post_types() {
        let archive = post_type.archive.clone().unwrap_or_else(|| "-".into());
        rows.push((
            format!("type {name}"),
            format!("{} (archive {archive})", post_type.single),
        ));
    }

    for filter in config.filters.iter().filter(|f| f.enable) {
        rows.push((
            format!("filter {}", filter.display_name()),
            format!(
                "{} `{}` -> `{}` (priority {})",
                filter.hook, filter.find, filter.replace, filter.priority
            ),
        ));
    }
    rows
}
