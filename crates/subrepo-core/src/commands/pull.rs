//! `pull`: bring upstream changes into the subdirectory.

use subrepo_git::{CommitMessage, GitOps};

use super::{Report, clone::reclone, fresh_state};
use crate::context::Intent;
use crate::error::Result;
use crate::graft::{self, GraftRequest, UpstreamCheck};
use crate::outcome::{Outcome, PendingJoin};
use crate::preflight;
use crate::publish;
use crate::reconcile::{self, Reconciliation};
use crate::subrepo::Subrepo;

/// Fetch, graft local history, join upstream, and publish the result.
///
/// Stops with [`Outcome::ConflictsPending`] if the join needs manual work;
/// the worktree is left for the user in that case.
///
/// # Errors
/// Returns fetch, graft and publish errors.
pub fn pull<G: GitOps>(repo: &G, intent: &Intent, subdir: &str) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    let mut state = fresh_state(repo)?;

    if intent.force {
        return reclone(repo, &workdir, intent, subrepo, state);
    }

    let upstream = subrepo.fetch(repo, &mut state)?;
    if subrepo.recorded_commit() == Some(upstream) && !intent.update {
        tracing::debug!(subdir = %subrepo.subdir, "up to date");
        return Ok(Report::new(&subrepo, Outcome::UpToDate, state));
    }

    graft::discard_branch(repo, &subrepo.refs, intent.command.name())?;
    let grafted = graft::graft(
        repo,
        &GraftRequest {
            subdir: &subrepo.subdir,
            refs: &subrepo.refs,
            parent: subrepo.sync_parent(),
            method: subrepo.method,
            check: UpstreamCheck::ReachableFromFetch,
        },
    )?;
    state.worktree = Some(grafted.worktree.clone());
    state.commit_ref = Some(grafted.branch.clone());

    match reconcile::reconcile(repo, &subrepo.refs, &grafted.worktree, subrepo.method)? {
        Reconciliation::Conflicted { output } => {
            let pending = PendingJoin {
                command: intent.command,
                subdir: subrepo.subdir.clone(),
                worktree: grafted.worktree,
                method: subrepo.method,
                local_branch: grafted.branch.clone(),
                output,
                message_file: match &intent.message {
                    Some(CommitMessage::File(path)) => Some(path.clone()),
                    _ => None,
                },
            };
            Ok(Report::new(&subrepo, Outcome::ConflictsPending(pending), state))
        }
        Reconciliation::Joined { tip } => {
            tracing::debug!(%tip, "joined upstream");
            publish::publish_to_host(repo, &workdir, &subrepo, intent, &state)?;
            Ok(Report::new(&subrepo, Outcome::Success, state))
        }
    }
}
