//! Terminal output formatting utilities.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use subrepo_core::PendingJoin;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "git-subrepo:".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print a detail line without prefix (suppressed in quiet mode).
///
/// Use for indented detail lines that accompany info or warn messages.
pub fn detail(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like config values.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Print the output of a join that stopped on conflicts, followed by the
/// steps to finish or abandon it (always to stderr).
pub fn conflict(pending: &PendingJoin, start_dir: &Path) {
    let output = pending.output.trim_end();
    if !output.is_empty() {
        eprintln!("{output}");
        eprintln!();
    }
    for line in pending.recovery_steps(start_dir) {
        eprintln!("{line}");
    }
}

/// Format an optional value, `none` when absent.
#[must_use]
pub fn or_none(value: Option<&str>) -> String {
    value.map_or_else(|| "none".dimmed().to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_or_none() {
        colored::control::set_override(false);
        assert_eq!(or_none(Some("abc1234")), "abc1234");
        assert_eq!(or_none(None), "none");
    }

    #[test]
    #[serial]
    fn test_quiet_mode_default() {
        // Reset to default state
        set_quiet(false);
        assert!(!is_quiet());
    }

    #[test]
    #[serial]
    fn test_quiet_mode_enabled() {
        set_quiet(true);
        assert!(is_quiet());
        // Reset
        set_quiet(false);
    }
}
