//! `clean`: drop the working branch, worktree and (forced) durable refs.

use subrepo_git::GitOps;

use crate::context::Intent;
use crate::error::Result;
use crate::graft;
use crate::preflight;
use crate::subrepo::Subrepo;

/// Prefix of every durable subrepo ref.
const REFS_PREFIX: &str = "refs/subrepo/";

/// Remove what earlier commands left behind for one subrepo.
///
/// Returns the removed branch and ref names.
///
/// # Errors
/// Returns `WorkingTreeDirty` if the worktree has uncommitted changes.
pub fn clean<G: GitOps>(repo: &G, intent: &Intent, subdir: &str) -> Result<Vec<String>> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    let mut removed = Vec::new();

    if graft::discard_branch(repo, &subrepo.refs, intent.command.name())? {
        removed.push(subrepo.refs.branch_name());
    }

    if intent.force {
        for (name, _) in repo.list_refs(&subrepo.refs.prefix())? {
            repo.delete_ref(&name)?;
            removed.push(name);
        }
    }

    tracing::debug!(subdir = %subrepo.subdir, removed = removed.len(), "cleaned");
    Ok(removed)
}

/// Delete every durable ref of every subrepo, including stale ones.
///
/// # Errors
/// Returns error if a ref cannot be deleted.
pub fn clean_all_refs<G: GitOps>(repo: &G) -> Result<Vec<String>> {
    let mut removed = Vec::new();
    for (name, _) in repo.list_refs(REFS_PREFIX)? {
        repo.delete_ref(&name)?;
        removed.push(name);
    }
    Ok(removed)
}
