//! Terminal logging.
//!
//! `log!("module"; ...)` prints `[module] message` to stderr, `debug!` only
//! with `--verbose`. Stdout is reserved for command output.
//!
//! | Prefix                   | Color  |
//! |--------------------------|--------|
//! | `link`, `archive`        | blue   |
//! | `adjacent`, `cache`      | green  |
//! | `error`                  | red    |
//! | `hint`                   | cyan   |
//! | anything else            | yellow |
//!
//! ```ignore
//! log!("list"; "resolved {} of {} entities", shown, total);
//! debug!("cache"; "hit {}", key);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Set once from `--verbose` before any command runs.
static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// `log!("module"; "format {}", args)`
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like [`log!`], but formats nothing unless `--verbose` is set.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stderr = stderr().lock();
    execute!(stderr, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "link" | "archive" => prefix.bright_blue().bold().to_string(),
        "adjacent" | "cache" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        "hint" => prefix.bright_cyan().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module_name() {
        assert!(colorize_prefix("link", "link").contains("[link]"));
        assert!(colorize_prefix("Error", "error").contains("[Error]"));
    }
}
