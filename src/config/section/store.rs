//! `[store]` section: where the CLI reads content from.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON content document (relative to the config file, `~` expanded).
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "content.json".into(),
        }
    }
}

impl StoreConfig {
    /// Resolve `path` against `root` with tilde expansion.
    pub fn normalize(&mut self, root: &Path) {
        let raw = self.path.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(&raw).into_owned());
        self.path = if expanded.is_relative() {
            root.join(expanded)
        } else {
            expanded
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_path() {
        let config = test_parse_config("");
        assert_eq!(config.store.path, PathBuf::from("content.json"));
    }

    #[test]
    fn test_relative_path_joins_root() {
        let mut store = StoreConfig {
            path: "data/content.json".into(),
        };
        store.normalize(Path::new("/srv/site"));
        assert_eq!(store.path, PathBuf::from("/srv/site/data/content.json"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let mut store = StoreConfig {
            path: "/var/content.json".into(),
        };
        store.normalize(Path::new("/srv/site"));
        assert_eq!(store.path, PathBuf::from("/var/content.json"));
    }

    #[test]
    fn test_tilde_expanded() {
        let mut store = StoreConfig {
            path: "~/content.json".into(),
        };
        store.normalize(Path::new("/srv/site"));
        let home = std::env::var("HOME").unwrap_or_default();
        if !home.is_empty() {
            assert_eq!(store.path, Path::new(&home).join("content.json"));
        }
    }
}
