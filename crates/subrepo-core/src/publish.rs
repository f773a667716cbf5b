//! Bringing a grafted branch into the host, and sending one upstream.

use std::path::Path;

use subrepo_git::{CommitMessage, GitOps, Oid};

use crate::context::{Intent, SyncState};
use crate::error::{Error, Result};
use crate::message::{self, MessageFields};
use crate::subrepo::Subrepo;

/// Replace the subdirectory content with `commit_ref` and commit to the host
/// branch.
///
/// Unless `--force` was given, `commit_ref` must contain the recorded
/// upstream head. The subrepo worktree is removed afterwards and must be
/// clean. Returns the new host commit.
///
/// # Errors
/// Returns `RefNotFound`, `MissingUpstreamHead` or `WorkingTreeDirty`, and
/// backend errors from the index update or the commit.
pub fn publish_to_host<G: GitOps>(
    repo: &G,
    workdir: &Path,
    subrepo: &Subrepo,
    intent: &Intent,
    state: &SyncState,
) -> Result<Oid> {
    let commit_ref = state
        .commit_ref
        .clone()
        .unwrap_or_else(|| subrepo.refs.branch_name());
    let tip = repo
        .resolve(&commit_ref)?
        .ok_or_else(|| Error::RefNotFound(commit_ref.clone()))?;

    if !intent.force {
        if let Some(upstream) = state.upstream_head {
            if !repo.is_ancestor(upstream, tip)? {
                return Err(Error::MissingUpstreamHead {
                    commit_ref,
                    upstream,
                });
            }
        }
    }

    if !repo.tracked_files(&subrepo.subdir)?.is_empty() {
        tracing::debug!(subdir = %subrepo.subdir, "removing old content");
        repo.remove_tracked(&subrepo.subdir)?;
    }
    tracing::debug!(subdir = %subrepo.subdir, %tip, "reading new content");
    repo.read_tree_into(&format!("{}/", subrepo.subdir), tip)?;

    subrepo.write_descriptor(repo, workdir, intent, state, Some(tip))?;

    let merge_commit = repo.commit_details(tip)?.parents.len() > 1;
    let message = commit_message(repo, subrepo, intent, state, Some(tip), merge_commit)?;
    let head = repo.commit_index(&message, intent.edit)?;

    let worktree = repo
        .worktree_for_branch(&subrepo.refs.branch_name())?
        .or_else(|| state.worktree.clone())
        .unwrap_or_else(|| subrepo.refs.worktree_path(repo.common_dir()));
    repo.remove_worktree(&worktree).map_err(|e| match e {
        subrepo_git::Error::DirtyWorkingDirectory(path) => Error::WorkingTreeDirty {
            command: intent.command.name().to_string(),
            path,
        },
        other => other.into(),
    })?;

    repo.update_ref(&subrepo.refs.commit(), tip)?;
    tracing::info!(subdir = %subrepo.subdir, %tip, %head, "published to host");
    Ok(head)
}

/// Message for a host commit: the user's, or a generated one.
///
/// # Errors
/// Returns error if commit ids cannot be abbreviated.
pub fn commit_message<G: GitOps>(
    repo: &G,
    subrepo: &Subrepo,
    intent: &Intent,
    state: &SyncState,
    merged: Option<Oid>,
    merge_commit: bool,
) -> Result<CommitMessage> {
    if let Some(message) = &intent.message {
        return Ok(message.clone());
    }
    let mut args = intent.message_args.clone();
    if intent.all {
        args.insert(0, subrepo.subdir.clone());
    }
    let text = message::generate(
        repo,
        &MessageFields {
            command: intent.command,
            args: &args,
            subdir: &subrepo.subdir,
            merged,
            merge_commit,
            remote: &subrepo.remote,
            branch: &subrepo.branch,
            upstream: state.upstream_head,
        },
    )?;
    Ok(CommitMessage::Text(text))
}

/// Result of pushing a branch upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushResult {
    /// Upstream now points at `head`.
    Pushed {
        /// New upstream head.
        head: Oid,
    },
    /// The branch already matches upstream.
    NothingToPush,
}

/// Push `local_branch` to the subrepo's upstream branch.
///
/// `new_upstream` means the upstream branch does not exist yet, so there is
/// nothing to compare against.
///
/// # Errors
/// Returns `NoBranchToPush` if the branch is missing and
/// `MissingUpstreamHead` if it does not contain the fetched upstream head.
pub fn push_upstream<G: GitOps>(
    repo: &G,
    subrepo: &Subrepo,
    local_branch: &str,
    force: bool,
    new_upstream: bool,
    upstream_head: Option<Oid>,
) -> Result<PushResult> {
    let tip = repo
        .resolve(&format!("refs/heads/{local_branch}"))?
        .ok_or_else(|| Error::NoBranchToPush(local_branch.to_string()))?;

    if !new_upstream && upstream_head == Some(tip) {
        tracing::debug!(branch = local_branch, "branch matches upstream");
        return Ok(PushResult::NothingToPush);
    }

    if !force && !new_upstream {
        if let Some(upstream) = upstream_head {
            if !repo.is_ancestor(upstream, tip)? {
                return Err(Error::MissingUpstreamHead {
                    commit_ref: local_branch.to_string(),
                    upstream,
                });
            }
        }
    }

    tracing::info!(
        branch = local_branch,
        remote = %subrepo.remote,
        upstream = %subrepo.branch,
        force,
        "pushing"
    );
    repo.push(&subrepo.remote, local_branch, &subrepo.branch, force)?;
    repo.update_ref(&subrepo.refs.push(), tip)?;
    Ok(PushResult::Pushed { head: tip })
}
