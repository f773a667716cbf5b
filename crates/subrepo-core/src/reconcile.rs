//! Joining fetched upstream changes into the grafted branch.

use std::path::Path;

use subrepo_git::{GitOps, JoinResult, Oid};

use crate::descriptor::Method;
use crate::error::{Error, Result};
use crate::refs::RefNamespace;

/// Result of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The join finished and `refs/subrepo/<ref>/branch` was moved to `tip`.
    Joined {
        /// New branch tip.
        tip: Oid,
    },
    /// The join stopped on conflicts; worktree and refs were left alone.
    Conflicted {
        /// Output of the failed merge or rebase.
        output: String,
    },
}

/// Merge or rebase the fetched upstream into the branch checked out in
/// `worktree`.
///
/// # Errors
/// Returns error if the join could not be started at all.
pub fn reconcile<G: GitOps>(
    repo: &G,
    refs: &RefNamespace,
    worktree: &Path,
    method: Method,
) -> Result<Reconciliation> {
    let upstream = refs.fetch();
    let branch = refs.branch_name();

    tracing::debug!(%method, upstream = %upstream, worktree = %worktree.display(), "joining upstream");
    let result = match method {
        Method::Merge => repo.merge_in(worktree, &upstream)?,
        Method::Rebase => repo.rebase_in(worktree, &upstream, &branch)?,
    };

    match result {
        JoinResult::Clean => {
            let tip = repo
                .resolve(&refs.branch_ref())?
                .ok_or_else(|| Error::RefNotFound(refs.branch_ref()))?;
            repo.update_ref(&refs.branch(), tip)?;
            Ok(Reconciliation::Joined { tip })
        }
        JoinResult::Conflicted { output } => {
            tracing::warn!(%method, branch = %branch, "join stopped on conflicts");
            Ok(Reconciliation::Conflicted { output })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graft::{Graft, GraftRequest, UpstreamCheck, graft};
    use crate::test_support::{git, init_repo, write_file};
    use subrepo_git::Repository;

    fn graft_sub(repo: &Repository, refs: &RefNamespace) -> Graft {
        graft(
            repo,
            &GraftRequest {
                subdir: "sub",
                refs,
                parent: None,
                method: Method::Merge,
                check: UpstreamCheck::Present,
            },
        )
        .unwrap()
    }

    /// Commit `content` to `file` in the worktree on top of `base`, then
    /// move the branch back to `base`; returns the new commit.
    fn side_commit(g: &Graft, base: Oid, file: &str, content: &str) -> Oid {
        git(&g.worktree, &["reset", "-q", "--hard", &base.to_string()]);
        write_file(&g.worktree, file, content);
        git(&g.worktree, &["add", "-A"]);
        git(&g.worktree, &["commit", "-q", "-m", &format!("edit {file}")]);
        let oid = Oid::from_str(&git(&g.worktree, &["rev-parse", "HEAD"])).unwrap();
        git(&g.worktree, &["reset", "-q", "--hard", &base.to_string()]);
        oid
    }

    #[test]
    fn test_merge_joins_and_moves_branch_ref() {
        let (_temp, repo) = init_repo();
        let refs = RefNamespace::for_subdir("sub").unwrap();
        let g = graft_sub(&repo, &refs);

        let upstream = side_commit(&g, g.tip, "upstream.txt", "up\n");
        repo.update_ref(&refs.fetch(), upstream).unwrap();

        let result = reconcile(&repo, &refs, &g.worktree, Method::Merge).unwrap();

        // Fast-forward onto upstream
        assert_eq!(result, Reconciliation::Joined { tip: upstream });
        assert_eq!(repo.resolve(&refs.branch()).unwrap(), Some(upstream));
    }

    #[test]
    fn test_conflict_leaves_refs_alone() {
        let (_temp, repo) = init_repo();
        let refs = RefNamespace::for_subdir("sub").unwrap();
        let g = graft_sub(&repo, &refs);

        let upstream = side_commit(&g, g.tip, "file.txt", "upstream\n");
        let local = side_commit(&g, g.tip, "file.txt", "local\n");
        git(&g.worktree, &["reset", "-q", "--hard", &local.to_string()]);
        repo.update_ref(&refs.fetch(), upstream).unwrap();

        let result = reconcile(&repo, &refs, &g.worktree, Method::Merge).unwrap();

        assert!(
            matches!(result, Reconciliation::Conflicted { ref output } if output.contains("CONFLICT"))
        );
        assert_eq!(repo.resolve(&refs.branch()).unwrap(), Some(g.tip));
        assert_eq!(repo.resolve(&refs.branch_ref()).unwrap(), Some(local));
        assert!(repo.require_clean_at(&g.worktree).is_err());
    }

    #[test]
    fn test_rebase_conflict_is_reported() {
        let (_temp, repo) = init_repo();
        let refs = RefNamespace::for_subdir("sub").unwrap();
        let g = graft_sub(&repo, &refs);

        let upstream = side_commit(&g, g.tip, "file.txt", "upstream\n");
        let local = side_commit(&g, g.tip, "file.txt", "local\n");
        git(&g.worktree, &["reset", "-q", "--hard", &local.to_string()]);
        repo.update_ref(&refs.fetch(), upstream).unwrap();

        let result = reconcile(&repo, &refs, &g.worktree, Method::Rebase).unwrap();
        assert!(matches!(result, Reconciliation::Conflicted { .. }));
        assert_eq!(repo.resolve(&refs.branch()).unwrap(), Some(g.tip));
    }
}
