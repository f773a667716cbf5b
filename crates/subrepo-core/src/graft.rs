//! Building the subrepo branch out of host history.
//!
//! The branch contains only the subdirectory's content. When the last sync
//! point is known, commits after it are replayed one by one on top of the
//! upstream commits recorded in `.gitrepo`, so the branch joins cleanly with
//! upstream. Without a sync point the whole history is reduced to the
//! subdirectory instead.

use std::collections::HashSet;
use std::path::PathBuf;

use subrepo_git::{GitOps, NewCommit, Oid};

use crate::descriptor::{Descriptor, Method};
use crate::error::{Error, Result};
use crate::refs::RefNamespace;
use crate::rewrite;

/// Message of the placeholder commit used when the subdirectory is absent.
const EMPTY_MESSAGE: &str = "EMPTY\n";

/// How strictly recorded upstream commits are checked while grafting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamCheck {
    /// Must be reachable from the fetched upstream head, when one was fetched.
    ReachableFromFetch,
    /// Must exist in the object store.
    Present,
}

/// Input of a graft.
#[derive(Debug, Clone)]
pub struct GraftRequest<'a> {
    /// Subdirectory being grafted.
    pub subdir: &'a str,
    /// Its ref namespace; the branch is `refs.branch_name()`.
    pub refs: &'a RefNamespace,
    /// Host commit to start after, if known.
    pub parent: Option<Oid>,
    /// Join method; decides where upstream merge points appear.
    pub method: Method,
    /// Check applied to recorded upstream commits.
    pub check: UpstreamCheck,
}

/// One replayed host commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraftedCommit {
    /// Host commit that was replayed.
    pub source: Oid,
    /// Upstream commit recorded in `.gitrepo` at that point.
    pub upstream: Oid,
    /// Commit written for the subrepo branch.
    pub synthesized: Oid,
}

/// Result of a graft.
#[derive(Debug, Clone)]
pub struct Graft {
    /// Branch name.
    pub branch: String,
    /// Branch tip.
    pub tip: Oid,
    /// Worktree with the branch checked out.
    pub worktree: PathBuf,
    /// False if the branch already existed and nothing was done.
    pub created: bool,
    /// Replayed commits, oldest first (empty without a sync point).
    pub commits: Vec<GraftedCommit>,
}

/// Create the subrepo branch and check it out in a worktree.
///
/// Does nothing if the branch already exists.
///
/// # Errors
/// Returns `AncestorNotFound` if the sync point is not an ancestor of HEAD
/// (no ref is touched in that case) and `HistoryRewritten` if a recorded
/// upstream commit is no longer known.
pub fn graft<G: GitOps>(repo: &G, request: &GraftRequest<'_>) -> Result<Graft> {
    let refs = request.refs;
    let branch = refs.branch_name();
    let expected_worktree = refs.worktree_path(repo.common_dir());

    if let Some(tip) = repo.resolve(&refs.branch_ref())? {
        tracing::debug!(branch = %branch, "branch exists, graft skipped");
        let worktree = repo
            .worktree_for_branch(&branch)?
            .unwrap_or(expected_worktree);
        return Ok(Graft {
            branch,
            tip,
            worktree,
            created: false,
            commits: Vec::new(),
        });
    }

    let head = repo
        .head_commit()?
        .ok_or_else(|| Error::RefNotFound("HEAD".into()))?;

    let (tip, commits) = match request.parent {
        Some(parent) => {
            check_sync_parent(repo, request, parent, head)?;
            let commits = replay(repo, request, parent, head)?;
            let tip = commits
                .last()
                .map(|c| c.synthesized)
                .ok_or_else(|| Error::EmptyGraft(request.subdir.to_string()))?;
            (tip, commits)
        }
        None => {
            tracing::debug!("no sync point, reducing history to the subdir");
            let tip = rewrite::keep_subdirectory(repo, head, request.subdir)?
                .ok_or_else(|| Error::EmptyGraft(request.subdir.to_string()))?;
            (tip, Vec::new())
        }
    };

    let first_upstream = commits.first().map(|c| c.upstream);
    let tip = rewrite::strip_descriptor(repo, tip, first_upstream)?
        .ok_or_else(|| Error::EmptyGraft(request.subdir.to_string()))?;

    repo.create_branch_at(&branch, tip)?;
    repo.add_worktree(&expected_worktree, &branch)?;
    repo.update_ref(&refs.branch(), tip)?;

    tracing::info!(branch = %branch, %tip, commits = commits.len(), "created subrepo branch");
    Ok(Graft {
        branch,
        tip,
        worktree: expected_worktree,
        created: true,
        commits,
    })
}

fn check_sync_parent<G: GitOps>(
    repo: &G,
    request: &GraftRequest<'_>,
    parent: Oid,
    head: Oid,
) -> Result<()> {
    if repo.object_exists(parent) && repo.is_ancestor(parent, head)? {
        return Ok(());
    }

    let gitrepo = Descriptor::relative_path(request.subdir);
    let hint = match repo.last_commit_changing(&gitrepo, "commit =")? {
        Some(changed) => repo.commit_details(changed)?.parents.first().copied(),
        None => None,
    };

    Err(Error::AncestorNotFound {
        parent,
        gitrepo: gitrepo.into(),
        subdir: request.subdir.to_string(),
        hint,
    })
}

/// Replay host commits after `parent` that carry a `.gitrepo`.
fn replay<G: GitOps>(
    repo: &G,
    request: &GraftRequest<'_>,
    parent: Oid,
    head: Oid,
) -> Result<Vec<GraftedCommit>> {
    let empty = repo.empty_tree()?;
    let fetched = match request.check {
        UpstreamCheck::ReachableFromFetch => repo.resolve(&request.refs.fetch())?,
        UpstreamCheck::Present => None,
    };

    let mut verified: HashSet<Oid> = HashSet::new();
    let mut grafted: Vec<GraftedCommit> = Vec::new();
    let mut ancestor: Option<Oid> = None;
    let mut last_upstream: Option<Oid> = None;

    for source in repo.ancestry_path(parent, head)? {
        let Some(upstream) = Descriptor::commit_at(repo, source, request.subdir)? else {
            tracing::trace!(%source, "no .gitrepo, skipped");
            continue;
        };

        let details = repo.commit_details(source)?;
        if let Some(ancestor) = ancestor {
            if !details.parents.contains(&ancestor) {
                tracing::trace!(%source, "not on the selected path, skipped");
                continue;
            }
        }
        ancestor = Some(source);

        if verified.insert(upstream) {
            let known = repo.object_exists(upstream)
                && match fetched {
                    Some(fetched) => repo.is_ancestor(upstream, fetched)?,
                    None => true,
                };
            if !known {
                return Err(Error::HistoryRewritten {
                    commit: upstream,
                    subdir: request.refs.subref().to_string(),
                });
            }
        }

        let mut parents = Vec::with_capacity(2);
        if let Some(previous) = grafted.last() {
            parents.push(previous.synthesized);
        }
        let first = grafted.is_empty();
        let upstream_moved = request.method == Method::Merge && last_upstream != Some(upstream);
        if (first || upstream_moved) && !parents.contains(&upstream) {
            parents.push(upstream);
        }
        if request.method == Method::Merge || first {
            last_upstream = Some(upstream);
        }

        let synthesized = match repo.subtree_at(source, request.subdir)? {
            Some(tree) => repo.write_commit(&NewCommit {
                tree,
                parents: &parents,
                message: &details.message,
                author: Some(&details.author),
                committer: None,
            })?,
            None => repo.write_commit(&NewCommit {
                tree: empty,
                parents: &parents,
                message: EMPTY_MESSAGE,
                author: None,
                committer: None,
            })?,
        };

        tracing::debug!(%source, %upstream, %synthesized, "grafted commit");
        grafted.push(GraftedCommit {
            source,
            upstream,
            synthesized,
        });
    }

    Ok(grafted)
}

/// Remove the subrepo branch and its worktree.
///
/// # Errors
/// Returns `WorkingTreeDirty` if the worktree has uncommitted changes.
pub fn discard_branch<G: GitOps>(repo: &G, refs: &RefNamespace, command: &str) -> Result<bool> {
    let branch = refs.branch_name();
    let worktree = repo
        .worktree_for_branch(&branch)?
        .unwrap_or_else(|| refs.worktree_path(repo.common_dir()));

    repo.remove_worktree(&worktree).map_err(|e| match e {
        subrepo_git::Error::DirtyWorkingDirectory(path) => Error::WorkingTreeDirty {
            command: command.to_string(),
            path,
        },
        other => other.into(),
    })?;

    let existed = repo.branch_exists(&branch);
    if existed {
        tracing::debug!(branch = %branch, "deleting subrepo branch");
        repo.delete_branch(&branch)?;
    }
    Ok(existed)
}
