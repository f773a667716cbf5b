//! `git subrepo version` and `upgrade` commands.

use std::path::Path;

use subrepo_git::GitCommand;

use crate::output;

/// Print the git-subrepo and git versions.
pub fn run() {
    output::essential(&format!("git-subrepo Version: {}", subrepo_core::VERSION));
    output::essential(env!("CARGO_PKG_REPOSITORY"));

    match GitCommand::new(Path::new(".")).arg("--version").run() {
        Ok(version) => output::essential(&format!("Git Version: {}", version.trim())),
        Err(e) => output::warn(&format!("Cannot determine the git version: {e}")),
    }
}

/// Self-upgrade is left to the package manager that installed the binary.
pub fn run_upgrade() {
    output::warn("git-subrepo cannot upgrade itself.");
    output::detail("Reinstall it with the tool you installed it with, e.g.:");
    output::detail("  cargo install subrepo-cli");
}
