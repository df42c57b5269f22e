//! Configuration error types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use super::FieldPath;
use crate::log;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    // No #[from]: a source() would print the diagnostics twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Config is rejected.
    Error,
    /// Value was accepted after an adjustment.
    Warning,
    /// Valid, but probably not what was meant.
    Hint,
}

/// One finding about one config field.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub severity: Severity,
    pub field: FieldPath,
    pub message: String,
    /// How to fix it (errors only).
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}: {}", "→".red(), self.field.key().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n    {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Collects every finding of a validation pass so all of them are
/// reported together.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    items: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, severity: Severity, field: FieldPath, message: String, hint: Option<String>) {
        self.items.push(ConfigDiagnostic {
            severity,
            field,
            message,
            hint,
        });
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Error, field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(Severity::Error, field, message.into(), Some(hint.into()));
    }

    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Warning, field, message.into(), None);
    }

    pub fn hint(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(Severity::Hint, field, message.into(), None);
    }

    fn of(&self, severity: Severity) -> Vec<&ConfigDiagnostic> {
        self.items.iter().filter(|d| d.severity == severity).collect()
    }

    pub fn errors(&self) -> Vec<&ConfigDiagnostic> {
        self.of(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&ConfigDiagnostic> {
        self.of(Severity::Warning)
    }

    pub fn hints(&self) -> Vec<&ConfigDiagnostic> {
        self.of(Severity::Hint)
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.items.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// No errors (warnings and hints do not count).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Log warnings and hints; errors are reported through [`Self::into_result`].
    pub fn print_hints_and_warnings(&self) {
        for item in &self.items {
            match item.severity {
                Severity::Warning => log!("warning"; "{} {}", item.field, item.message),
                Severity::Hint => log!("hint"; "{} {}", item.field, item.message),
                Severity::Error => {}
            }
        }
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    /// Errors grouped under their `[section]`, sections in name order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections: BTreeMap<&str, Vec<&ConfigDiagnostic>> = BTreeMap::new();
        for err in self.errors() {
            sections.entry(err.field.section()).or_default().push(err);
        }

        write!(f, "{}", "config validation failed:".red().bold())?;
        for (section, errors) in &sections {
            write!(f, "\n\n{}{}{}", "[".dimmed(), section.cyan(), "]".dimmed())?;
            for err in errors {
                write!(f, "\n{err}")?;
            }
        }

        let count = self.len();
        if count > 1 {
            write!(
                f,
                "\n\n{} {} {}",
                "found".dimmed(),
                count.to_string().red().bold(),
                "errors".dimmed()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("permalink.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("permalink.toml"));

        let validation_err = ConfigError::Validation("config file not found".to_string());
        assert!(validation_err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_diagnostics_collect_all_errors() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("site.url"), "missing");
        diag.error_with_hint(FieldPath::new("site.timezone"), "bad offset", "use +08:00");
        diag.warn(FieldPath::new("permalink.tag_base"), "trimmed");

        assert_eq!(diag.len(), 2);
        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.errors()[1].hint.as_deref(), Some("use +08:00"));

        let display = diag.into_result().unwrap_err().to_string();
        assert!(display.contains("url"));
        assert!(display.contains("bad offset"));
    }

    #[test]
    fn test_display_groups_by_section() {
        owo_colors::set_override(false);
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("slug.max_length"), "out of range");
        diag.error(FieldPath::new("permalink.feed_base"), "empty");
        diag.error(FieldPath::new("permalink.search_base"), "empty");

        let display = diag.to_string();
        assert_eq!(display.matches("[permalink]").count(), 1);
        let permalink = display.find("[permalink]").unwrap();
        let slug = display.find("[slug]").unwrap();
        assert!(permalink < slug);
        assert!(display.contains("found 3 errors"));
    }

    #[test]
    fn test_warnings_alone_are_ok() {
        let mut diag = ConfigDiagnostics::new();
        diag.warn(FieldPath::new("permalink.tag_base"), "trimmed");
        diag.hint(FieldPath::new("permalink.structure"), "ambiguous");
        assert!(diag.is_empty());
        assert!(diag.into_result().is_ok());
    }
}
