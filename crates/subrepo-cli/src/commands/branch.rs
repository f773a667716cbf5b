//! `git subrepo branch` command - Graft a subrepo's history onto a branch.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, commands};

use super::utils::{self, Session};
use crate::output;

/// Run the branch command.
pub fn run(subdir: Option<String>, all: bool, fetch: bool, force: bool) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Branch)?;

    let mut intent = Intent::new(CommandKind::Branch);
    intent.all = all;
    intent.fetch = fetch;
    intent.force = force;

    for subdir in utils::target_subdirs(&repo, subdir, all, false)? {
        let report = commands::branch(&repo, &intent, &subdir)?;
        let branch = report.state.commit_ref.unwrap_or_default();
        let worktree = report
            .state
            .worktree
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        output::success(&format!(
            "Created branch '{branch}' and worktree '{worktree}'."
        ));
    }
    Ok(())
}
