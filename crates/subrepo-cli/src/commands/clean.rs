//! `git subrepo clean` command - Remove leftover branches, worktrees and refs.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, commands};

use super::utils::{self, Session};
use crate::output;

/// Run the clean command.
pub fn run(subdir: Option<String>, all: bool, all_nested: bool, force: bool) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Clean)?;

    let mut intent = Intent::new(CommandKind::Clean);
    intent.all = all;
    intent.all_nested = all_nested;
    intent.force = force;

    let mut removed = Vec::new();
    for subdir in utils::target_subdirs(&repo, subdir, all, all_nested)? {
        removed.extend(commands::clean(&repo, &intent, &subdir)?);
    }
    if all && force {
        removed.extend(commands::clean_all_refs(&repo)?);
    }

    if removed.is_empty() {
        output::info("Nothing to clean.");
    }
    for name in removed {
        if name.starts_with("refs/") {
            output::success(&format!("Removed ref '{name}'."));
        } else {
            output::success(&format!("Removed branch '{name}'."));
        }
    }
    Ok(())
}
