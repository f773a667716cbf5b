//! Checks run before a command touches anything.

use std::path::{Path, PathBuf};

use subrepo_git::GitOps;

use crate::context::{CommandKind, Intent, SyncState};
use crate::error::{Error, Result};
use crate::refs::RefNamespace;

/// Verify the host repository can run `command` from `cwd`.
///
/// Returns the starting state: host branch and HEAD.
///
/// # Errors
/// Returns `NotReady` when not at the top level, on a detached HEAD, on a
/// subrepo branch, or without commits (except for clone), and
/// `WorkingTreeDirty` when a command needing a clean tree finds changes.
pub fn check_repository<G: GitOps>(repo: &G, command: CommandKind, cwd: &Path) -> Result<SyncState> {
    let workdir = work_tree(repo)?;
    if !same_dir(&workdir, cwd) {
        return Err(Error::NotReady(
            "Need to run subrepo command from top level directory of the repo.".into(),
        ));
    }

    let host_branch = match repo.current_branch() {
        Ok(branch) => branch,
        Err(subrepo_git::Error::DetachedHead) => {
            return Err(Error::NotReady("Must be on a branch to run this command.".into()));
        }
        Err(e) => return Err(e.into()),
    };
    if host_branch.starts_with("subrepo/") {
        return Err(Error::NotReady(format!(
            "Can't '{command}' while subrepo branch is checked out."
        )));
    }

    let host_head = repo.head_commit()?;
    if host_head.is_none() && command != CommandKind::Clone {
        return Err(Error::NotReady("HEAD does not exist".into()));
    }

    if command.needs_clean_tree() && !repo.is_clean()? {
        return Err(Error::WorkingTreeDirty {
            command: command.name().to_string(),
            path: workdir.display().to_string(),
        });
    }

    tracing::debug!(branch = %host_branch, head = ?host_head, %command, "repository ready");
    Ok(SyncState {
        host_branch,
        host_head,
        ..SyncState::default()
    })
}

/// Verify the subrepo's worktree situation suits the command.
///
/// # Errors
/// Returns `NotReady` if `commit` has no worktree to publish from, or if a
/// leftover worktree would be clobbered by another command.
pub fn check_worktree<G: GitOps>(repo: &G, refs: &RefNamespace, intent: &Intent) -> Result<()> {
    if intent.force {
        return Ok(());
    }
    let branch = refs.branch_name();
    let worktree = repo.worktree_for_branch(&branch)?;

    if intent.command == CommandKind::Commit && worktree.is_none() {
        return Err(Error::NotReady(
            "There is no worktree available, use the branch command first".into(),
        ));
    }
    if !intent.command.tolerates_worktree() && worktree.is_some() {
        return Err(Error::NotReady(format!(
            "There is already a worktree with branch {branch}.\n\
             Use the --force flag to override this check or perform a subrepo clean\n\
             to remove the worktree."
        )));
    }
    Ok(())
}

/// The host work tree.
///
/// # Errors
/// Returns `BareRepository` (from the backend) without one.
pub fn work_tree<G: GitOps>(repo: &G) -> Result<PathBuf> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| subrepo_git::Error::BareRepository.into())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
