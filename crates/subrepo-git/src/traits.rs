//! Trait abstractions for git operations.
//!
//! This module defines the `GitOps` trait which abstracts every repository
//! operation the subrepo engine performs, so the engine never shells out or
//! touches git2 directly.

use std::path::{Path, PathBuf};

use git2::Oid;

use crate::{CommitDetails, CommitMessage, Identity, JoinResult, NewCommit, Result};

/// Trait for git repository operations.
///
/// Every call blocks until the underlying operation has finished.
#[allow(clippy::missing_errors_doc)]
pub trait GitOps {
    // === Repository Info ===

    /// Get the working directory path.
    fn workdir(&self) -> Option<&Path>;

    /// Directory shared by all worktrees (`git rev-parse --git-common-dir`).
    fn common_dir(&self) -> &Path;

    /// Get the current branch name, also for an unborn branch.
    fn current_branch(&self) -> Result<String>;

    /// Commit HEAD points at, `None` if the repository has no commits yet.
    fn head_commit(&self) -> Result<Option<Oid>>;

    /// Check if the working tree and index match HEAD (untracked files ignored).
    fn is_clean(&self) -> Result<bool>;

    /// Require that the working tree at `path` has no uncommitted changes.
    fn require_clean_at(&self, path: &Path) -> Result<()>;

    /// Read a string from the repository's git config.
    fn config_string(&self, key: &str) -> Result<Option<String>>;

    /// The identity git would use as committer right now.
    fn current_identity(&self) -> Result<Identity>;

    // === Revisions ===

    /// Resolve a revision to a commit, `None` if it does not exist.
    fn resolve(&self, rev: &str) -> Result<Option<Oid>>;

    /// Check if an object is present in the object store.
    fn object_exists(&self, oid: Oid) -> bool;

    /// Check if `ancestor` is `descendant` or one of its ancestors.
    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool>;

    /// Commits on the ancestry path `from..to`, oldest first, topologically.
    fn ancestry_path(&self, from: Oid, to: Oid) -> Result<Vec<Oid>>;

    /// Commits reachable from `tip` but not from `hide`, oldest first.
    fn history(&self, tip: Oid, hide: Option<Oid>, first_parent: bool) -> Result<Vec<Oid>>;

    /// Load tree, parents, identities and message of a commit.
    fn commit_details(&self, oid: Oid) -> Result<CommitDetails>;

    /// Last commit whose diff of `path` adds or removes a line matching `pattern`.
    fn last_commit_changing(&self, path: &str, pattern: &str) -> Result<Option<Oid>>;

    /// Abbreviated object id.
    fn short_id(&self, oid: Oid) -> Result<String>;

    // === Objects ===

    /// Tree stored at `path` in `commit`, `None` if absent or not a directory.
    fn subtree_at(&self, commit: Oid, path: &str) -> Result<Option<Oid>>;

    /// Blob content at `path` in `commit`, `None` if absent.
    fn read_blob_at(&self, commit: Oid, path: &str) -> Result<Option<Vec<u8>>>;

    /// Copy of `tree` without its top-level entry `name`.
    fn tree_without(&self, tree: Oid, name: &str) -> Result<Oid>;

    /// The canonical empty tree.
    fn empty_tree(&self) -> Result<Oid>;

    /// Write a commit object without moving any ref.
    fn write_commit(&self, commit: &NewCommit<'_>) -> Result<Oid>;

    // === Refs and Branches ===

    /// Check if a local branch exists.
    fn branch_exists(&self, name: &str) -> bool;

    /// Create a local branch pointing at `target`.
    fn create_branch_at(&self, name: &str, target: Oid) -> Result<()>;

    /// Delete a local branch; a missing branch is not an error.
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Create or move a ref.
    fn update_ref(&self, name: &str, target: Oid) -> Result<()>;

    /// Delete a ref; a missing ref is not an error.
    fn delete_ref(&self, name: &str) -> Result<()>;

    /// All refs whose full name starts with `prefix`.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Oid)>>;

    // === Remote Operations ===

    /// Fetch `branch` (or the remote HEAD) and return the fetched commit.
    ///
    /// Returns `RemoteRefNotFound` when the remote has no such ref.
    fn fetch(&self, remote: &str, branch: Option<&str>) -> Result<Oid>;

    /// Check if the remote advertises a ref matching `name`.
    fn remote_ref_exists(&self, remote: &str, name: &str) -> Result<bool>;

    /// Branch the remote's HEAD points at.
    fn remote_head_branch(&self, remote: &str) -> Result<String>;

    /// Push a local branch to `remote_branch` on `remote`.
    fn push(&self, remote: &str, local_branch: &str, remote_branch: &str, force: bool)
    -> Result<()>;

    // === Worktrees ===

    /// Check out `branch` into a new worktree at `path`.
    fn add_worktree(&self, path: &Path, branch: &str) -> Result<()>;

    /// Remove the worktree at `path` after checking it has no changes.
    fn remove_worktree(&self, path: &Path) -> Result<()>;

    /// Path of the worktree that has `branch` checked out.
    fn worktree_for_branch(&self, branch: &str) -> Result<Option<PathBuf>>;

    /// Merge `rev` into whatever is checked out in `worktree`.
    fn merge_in(&self, worktree: &Path, rev: &str) -> Result<JoinResult>;

    /// Rebase `branch` onto `upstream` inside `worktree`.
    fn rebase_in(&self, worktree: &Path, upstream: &str, branch: &str) -> Result<JoinResult>;

    // === Index and Working Tree ===

    /// Tracked files under `path`.
    fn tracked_files(&self, path: &str) -> Result<Vec<String>>;

    /// Remove `path` from index and working tree.
    fn remove_tracked(&self, path: &str) -> Result<()>;

    /// Read the tree of `commit` into the index and working tree under `prefix`.
    fn read_tree_into(&self, prefix: &str, commit: Oid) -> Result<()>;

    /// Stage a file even if ignored.
    fn stage_force(&self, path: &str) -> Result<()>;

    /// Commit the index to the current branch, creating the root commit if needed.
    fn commit_index(&self, message: &CommitMessage, edit: bool) -> Result<Oid>;

    // === Config Files ===

    /// Read `key` from a standalone git config file, `None` if unset.
    fn config_file_get(&self, file: &Path, key: &str) -> Result<Option<String>>;

    /// Read `key` from the config file stored at `path` in `commit`.
    ///
    /// `None` if the file is absent there or does not set the key.
    fn config_blob_get(&self, commit: Oid, path: &str, key: &str) -> Result<Option<String>>;

    /// Set `key` in a standalone git config file.
    fn config_file_set(&self, file: &Path, key: &str, value: &str) -> Result<()>;
}
