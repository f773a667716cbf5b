//! `branch`: build the subrepo branch without joining upstream.

use subrepo_git::GitOps;

use super::{Report, fresh_state};
use crate::context::Intent;
use crate::error::{Error, Result};
use crate::graft::{self, GraftRequest, UpstreamCheck};
use crate::outcome::Outcome;
use crate::preflight;
use crate::subrepo::Subrepo;

/// Graft the subdirectory history onto `subrepo/<ref>` and check it out in
/// a worktree.
///
/// # Errors
/// Returns `BranchExists` if the branch is already there (unless `--force`)
/// and graft errors.
pub fn branch<G: GitOps>(repo: &G, intent: &Intent, subdir: &str) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    let mut state = fresh_state(repo)?;

    if intent.fetch {
        subrepo.fetch(repo, &mut state)?;
    }

    let name = subrepo.refs.branch_name();
    if repo.branch_exists(&name) {
        if !intent.force {
            return Err(Error::BranchExists(name));
        }
        graft::discard_branch(repo, &subrepo.refs, intent.command.name())?;
    }

    let grafted = graft::graft(
        repo,
        &GraftRequest {
            subdir: &subrepo.subdir,
            refs: &subrepo.refs,
            parent: subrepo.sync_parent(),
            method: subrepo.method,
            check: UpstreamCheck::Present,
        },
    )?;
    state.worktree = Some(grafted.worktree);
    state.commit_ref = Some(grafted.branch);

    Ok(Report::new(&subrepo, Outcome::Success, state))
}
