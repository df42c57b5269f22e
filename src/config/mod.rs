//! Site configuration management for `permalink.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── filters    # [[filters]]
//! │   ├── permalink  # [permalink] and [permalink.post_types.*]
//! │   ├── site       # [site]
//! │   ├── slug       # [slug]
//! │   └── store      # [store]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section                         | Purpose                                   |
//! |---------------------------------|-------------------------------------------|
//! | `[site]`                        | Base URL, timezone, front page            |
//! | `[permalink]`                   | Structure, archive bases, slash policy    |
//! | `[permalink.post_types.<name>]` | Custom entity kinds                       |
//! | `[slug]`                        | Fallback slug generation                  |
//! | `[store]`                       | Content document for the CLI              |
//! | `[[filters]]`                   | Regex rewrites on link hooks              |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{
    FilterConfig, PermalinkConfig, PostTypeConfig, SiteSectionConfig, SlugConfig, SlugSeparator, StoreConfig,
};

// Re-export from types/
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{cli::Cli, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing permalink.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub permalink: PermalinkConfig,

    #[serde(default)]
    pub slug: SlugConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl SiteConfig {
    /// Locate, parse, finalize and validate the config named by `--config`.
    ///
    /// Relative paths inside the file resolve against its directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(ConfigError::Validation(format!(
                "config file '{}' not found in this directory or any parent",
                cli.config.display()
            )));
        };

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve paths against the config directory and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.set_root(&root);

        if let Some(store) = &cli.store {
            // CLI paths are relative to cwd, not to the config file
            let cwd = std::env::current_dir().unwrap_or_default();
            self.store.path = cwd.join(store);
        }
        self.store.normalize(&root);
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Read and parse `path`. Unknown keys are reported, not rejected.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        for field in &ignored {
            log!("warning"; "unknown field `{}` in {}, ignored", field, path.display());
        }
        Ok(config)
    }

    /// Parse TOML, returning the dotted paths of keys no section knows.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Fix up adjustable fields, then validate everything.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&mut self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.permalink.normalize(&mut diag);

        self.site.validate(&mut diag);
        self.permalink.validate(&mut diag);
        self.slug.validate(&mut diag);
        for filter in &self.filters {
            filter.validate(&mut diag);
        }

        diag.print_hints_and_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
