//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Canonical base URL: scheme and host lowercased, no trailing slash.
/// `None` when `url_str` does not parse.
///
/// ```ignore
/// normalize_base_url("https://Example.com/")       -> Some("https://example.com")
/// normalize_base_url("https://example.com/blog/")  -> Some("https://example.com/blog")
/// normalize_base_url("invalid")                    -> None
/// ```
pub fn normalize_base_url(url_str: &str) -> Option<String> {
    let parsed = url::Url::parse(url_str).ok()?;
    Some(parsed.as_str().trim_end_matches('/').to_string())
}

/// Locate the config file: an absolute path as is, otherwise the nearest
/// `config_name` in the working directory or one of its ancestors.
///
/// ```text
/// /home/user/site/content/        <- cwd
/// /home/user/site/permalink.toml  <- found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://example.com"),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            normalize_base_url("https://Example.COM/"),
            Some("https://example.com".to_string())
        );
        assert_eq!(
            normalize_base_url("https://example.github.io/my-project/"),
            Some("https://example.github.io/my-project".to_string())
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/blog"),
            Some("http://localhost:8080/blog".to_string())
        );
        assert_eq!(normalize_base_url("invalid-url"), None);
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("permalink.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path.clone()));
        assert_eq!(find_config_file(&dir.path().join("missing.toml")), None);
    }
}
