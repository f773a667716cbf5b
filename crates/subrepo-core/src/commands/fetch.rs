//! `fetch`: update the subrepo's `fetch` ref from upstream.

use subrepo_git::GitOps;

use super::{Report, fresh_state};
use crate::context::Intent;
use crate::error::Result;
use crate::outcome::Outcome;
use crate::preflight;
use crate::subrepo::Subrepo;

/// Fetch upstream for one subrepo.
///
/// A subrepo without remote is skipped; its report has no upstream head.
///
/// # Errors
/// Returns error if the fetch fails.
pub fn fetch<G: GitOps>(repo: &G, intent: &Intent, subdir: &str) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    let mut state = fresh_state(repo)?;

    if subrepo.has_remote() {
        subrepo.fetch(repo, &mut state)?;
    } else {
        tracing::debug!(subdir = %subrepo.subdir, "no remote, fetch skipped");
    }
    Ok(Report::new(&subrepo, Outcome::Success, state))
}
