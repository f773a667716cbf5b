//! History rewrites over commit objects.
//!
//! Two rewrites are needed when building a subrepo branch: reducing a whole
//! history to one subdirectory, and dropping the `.gitrepo` file from a
//! grafted range. Both prune commits that end up changing nothing.

use std::collections::HashMap;

use subrepo_git::{GitOps, NewCommit, Oid};

use crate::descriptor::GITREPO_FILE;
use crate::error::Result;

/// Rewrite everything reachable from `tip` so each commit's root is the tree
/// at `subdir`. Returns the rewritten tip, `None` if nothing is left.
///
/// # Errors
/// Returns error if objects cannot be read or written.
pub fn keep_subdirectory<G: GitOps>(repo: &G, tip: Oid, subdir: &str) -> Result<Option<Oid>> {
    let empty = repo.empty_tree()?;
    let mut rewriter = Rewriter::new(repo, true);

    for oid in repo.history(tip, None, false)? {
        let tree = repo.subtree_at(oid, subdir)?.unwrap_or(empty);
        rewriter.rewrite(oid, tree, empty)?;
    }

    tracing::debug!(%tip, subdir, rewritten = rewriter.mapped.len(), "kept subdirectory history");
    Ok(rewriter.target(tip))
}

/// Remove `.gitrepo` from the first-parent line `boundary..tip`.
///
/// Commits outside the range are kept as they are. Returns the rewritten
/// tip, `None` if the whole line was pruned away.
///
/// # Errors
/// Returns error if objects cannot be read or written.
pub fn strip_descriptor<G: GitOps>(repo: &G, tip: Oid, boundary: Option<Oid>) -> Result<Option<Oid>> {
    let empty = repo.empty_tree()?;
    let mut rewriter = Rewriter::new(repo, false);

    for oid in repo.history(tip, boundary, true)? {
        let tree = repo.commit_details(oid)?.tree;
        let stripped = repo.tree_without(tree, GITREPO_FILE)?;
        rewriter.rewrite(oid, stripped, empty)?;
    }

    Ok(rewriter.target(tip))
}

struct Rewriter<'a, G> {
    repo: &'a G,
    /// Old commit to its replacement; `None` means it was pruned without a
    /// parent to fall back on.
    mapped: HashMap<Oid, Option<Oid>>,
    simplify_merges: bool,
}

impl<'a, G: GitOps> Rewriter<'a, G> {
    fn new(repo: &'a G, simplify_merges: bool) -> Self {
        Self {
            repo,
            mapped: HashMap::new(),
            simplify_merges,
        }
    }

    fn target(&self, oid: Oid) -> Option<Oid> {
        self.mapped.get(&oid).copied().unwrap_or(Some(oid))
    }

    fn rewrite(&mut self, oid: Oid, tree: Oid, empty: Oid) -> Result<()> {
        let details = self.repo.commit_details(oid)?;

        let mut parents: Vec<Oid> = Vec::with_capacity(details.parents.len());
        for parent in details.parents.iter().filter_map(|p| self.target(*p)) {
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        if self.simplify_merges && parents.len() > 1 {
            parents = self.drop_redundant(parents)?;
        }

        let result = match parents.as_slice() {
            [] if tree == empty => None,
            [parent] if self.repo.commit_details(*parent)?.tree == tree => Some(*parent),
            _ => Some(self.repo.write_commit(&NewCommit {
                tree,
                parents: &parents,
                message: &details.message,
                author: Some(&details.author),
                committer: Some(&details.committer),
            })?),
        };

        self.mapped.insert(oid, result);
        Ok(())
    }

    /// Drop parents that are ancestors of another parent.
    fn drop_redundant(&self, parents: Vec<Oid>) -> Result<Vec<Oid>> {
        let mut kept = Vec::with_capacity(parents.len());
        for (i, candidate) in parents.iter().enumerate() {
            let mut redundant = false;
            for (j, other) in parents.iter().enumerate() {
                if i != j && self.repo.is_ancestor(*candidate, *other)? {
                    redundant = true;
                    break;
                }
            }
            if !redundant {
                kept.push(*candidate);
            }
        }
        Ok(kept)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{commit_all, git, init_repo, write_file};

    #[test]
    fn test_keep_subdirectory_prunes_unrelated_commits() {
        let (temp, repo) = init_repo();
        write_file(temp.path(), "README", "changed\n");
        commit_all(temp.path(), "outside only");
        write_file(temp.path(), "sub/second.txt", "two\n");
        let head = commit_all(temp.path(), "inside");

        let tip = keep_subdirectory(&repo, head, "sub").unwrap().unwrap();
        let details = repo.commit_details(tip).unwrap();
        assert_eq!(details.message, "inside\n");
        assert_eq!(Some(details.tree), repo.subtree_at(head, "sub").unwrap());

        // initial commit -> inside, the README-only commit is gone
        let history = repo.history(tip, None, false).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_keep_subdirectory_without_content() {
        let (_temp, repo) = init_repo();
        let head = repo.head_commit().unwrap().unwrap();
        assert_eq!(keep_subdirectory(&repo, head, "missing").unwrap(), None);
    }

    #[test]
    fn test_strip_descriptor_prunes_descriptor_only_commits() {
        let (temp, repo) = init_repo();
        let base = repo.head_commit().unwrap().unwrap();
        write_file(temp.path(), ".gitrepo", "[subrepo]\n");
        commit_all(temp.path(), "descriptor only");
        write_file(temp.path(), "more.txt", "more\n");
        let head = commit_all(temp.path(), "more");

        let tip = strip_descriptor(&repo, head, Some(base)).unwrap().unwrap();
        let details = repo.commit_details(tip).unwrap();
        assert_eq!(details.parents, vec![base]);
        assert!(repo.read_blob_at(tip, ".gitrepo").unwrap().is_none());
        assert!(repo.read_blob_at(tip, "more.txt").unwrap().is_some());
        // Authors and committers are carried over
        assert_eq!(details.author, repo.commit_details(head).unwrap().author);
    }

    #[test]
    fn test_strip_descriptor_noop_keeps_ids() {
        let (temp, repo) = init_repo();
        let head = repo.head_commit().unwrap().unwrap();
        assert_eq!(strip_descriptor(&repo, head, None).unwrap(), Some(head));
        assert_eq!(git(temp.path(), &["rev-parse", "HEAD"]), head.to_string());
    }
}
