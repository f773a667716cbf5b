//! `push`: send local subdirectory changes upstream.

use subrepo_git::{CommitMessage, GitOps, Oid};

use super::{Report, fresh_state};
use crate::context::Intent;
use crate::descriptor::Method;
use crate::error::{Error, Result};
use crate::graft::{self, GraftRequest, UpstreamCheck};
use crate::outcome::{Outcome, PendingJoin};
use crate::preflight;
use crate::publish::{self, PushResult};
use crate::reconcile::{self, Reconciliation};
use crate::refs::RefNamespace;
use crate::subrepo::Subrepo;

/// Push the subrepo's history to its upstream branch.
///
/// Without `branch` the local history is grafted first (rebased onto the
/// fetched upstream when the method is `rebase`); the temporary branch is
/// removed afterwards. With `branch` that existing branch is pushed as is.
///
/// # Errors
/// Returns `UpstreamDiverged` when upstream moved since the last pull,
/// `InvalidOption` for `--squash` with a branch, and graft or push errors.
pub fn push<G: GitOps>(
    repo: &G,
    intent: &Intent,
    subdir: &str,
    branch: Option<&str>,
) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    let mut state = fresh_state(repo)?;

    let previous_branch_ref = repo.resolve(&subrepo.refs.branch())?;
    let mut new_upstream = false;
    let created = branch.is_none();

    let local_branch = if let Some(branch) = branch {
        if intent.squash {
            return Err(Error::InvalidOption(
                "Squash option (-s) can't be used with branch parameter".into(),
            ));
        }
        state.upstream_head = repo.resolve(&subrepo.refs.fetch())?;
        branch.to_string()
    } else {
        match subrepo.fetch(repo, &mut state) {
            Ok(upstream) => {
                if !intent.force && subrepo.recorded_commit() != Some(upstream) {
                    return Err(Error::UpstreamDiverged);
                }
            }
            Err(Error::Backend(subrepo_git::Error::RemoteRefNotFound { .. })) => {
                tracing::info!(
                    remote = %subrepo.remote,
                    branch = %subrepo.branch,
                    "pushing to new upstream"
                );
                new_upstream = true;
            }
            Err(e) => return Err(e),
        }

        graft::discard_branch(repo, &subrepo.refs, intent.command.name())?;
        let parent = if intent.squash {
            repo.resolve("HEAD^")?
        } else {
            subrepo.sync_parent()
        };
        let grafted = graft::graft(
            repo,
            &GraftRequest {
                subdir: &subrepo.subdir,
                refs: &subrepo.refs,
                parent,
                method: subrepo.method,
                check: UpstreamCheck::Present,
            },
        )?;
        state.worktree = Some(grafted.worktree.clone());

        if subrepo.method == Method::Rebase && !new_upstream {
            let joined = reconcile::reconcile(repo, &subrepo.refs, &grafted.worktree, subrepo.method)?;
            if let Reconciliation::Conflicted { output } = joined {
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
                return Ok(Report::new(&subrepo, Outcome::ConflictsPending(pending), state));
            }
        }
        grafted.branch
    };

    let result = publish::push_upstream(
        repo,
        &subrepo,
        &local_branch,
        intent.force,
        new_upstream,
        state.upstream_head,
    )?;

    match result {
        PushResult::NothingToPush => {
            if created {
                graft::discard_branch(repo, &subrepo.refs, intent.command.name())?;
                restore_branch_ref(repo, &subrepo.refs, previous_branch_ref)?;
            }
            Ok(Report::new(&subrepo, Outcome::NothingToPush, state))
        }
        PushResult::Pushed { head } => {
            if created {
                graft::discard_branch(repo, &subrepo.refs, intent.command.name())?;
            }
            state.upstream_head = Some(head);
            state.commit_ref = Some(head.to_string());
            subrepo.write_descriptor(repo, &workdir, intent, &state, Some(head))?;

            let message = publish::commit_message(repo, &subrepo, intent, &state, Some(head), false)?;
            repo.commit_index(&message, intent.edit)?;
            tracing::info!(subdir = %subrepo.subdir, %head, "pushed");
            Ok(Report::new(&subrepo, Outcome::Success, state))
        }
    }
}

fn restore_branch_ref<G: GitOps>(repo: &G, refs: &RefNamespace, previous: Option<Oid>) -> Result<()> {
    match previous {
        Some(oid) => repo.update_ref(&refs.branch(), oid)?,
        None => repo.delete_ref(&refs.branch())?,
    }
    Ok(())
}
