//! Repository wrapper providing high-level git operations.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{BranchType, ErrorCode, ObjectType, Oid, Sort, StatusOptions};

use crate::command::GitCommand;
use crate::error::{Error, Result};
use crate::traits::GitOps;
use crate::types::{CommitDetails, CommitMessage, Identity, JoinResult, NewCommit};

/// High-level wrapper around a git repository.
pub struct Repository {
    inner: git2::Repository,
}

impl Repository {
    /// Open a repository at the given path.
    ///
    /// # Errors
    /// Returns error if no repository found at path or any parent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| Error::NotARepository)?;
        Ok(Self { inner })
    }

    /// Open the repository containing the current directory.
    ///
    /// # Errors
    /// Returns error if not inside a git repository.
    pub fn open_current() -> Result<Self> {
        Self::open(".")
    }

    /// Get the path to the .git directory.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    /// Get a reference to the underlying git2 repository.
    ///
    /// Use sparingly - prefer high-level methods.
    #[must_use]
    pub fn inner(&self) -> &git2::Repository {
        &self.inner
    }

    /// Start a `git` command in the working directory.
    fn git(&self) -> Result<GitCommand> {
        let workdir = self.inner.workdir().ok_or(Error::BareRepository)?;
        Ok(GitCommand::new(workdir))
    }

    fn find_tree_entry(&self, commit: Oid, path: &str) -> Result<Option<git2::TreeEntry<'static>>> {
        let tree = self.inner.find_commit(commit)?.tree()?;
        match tree.get_path(Path::new(path)) {
            Ok(entry) => Ok(Some(entry.to_owned())),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn join_in(cmd: GitCommand) -> Result<JoinResult> {
        let output = cmd.output()?;
        if output.success() {
            Ok(JoinResult::Clean)
        } else {
            Ok(JoinResult::Conflicted {
                output: output.combined(),
            })
        }
    }
}

/// Check a repository for staged or unstaged changes, ignoring untracked files.
fn status_is_clean(repo: &git2::Repository) -> Result<bool> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(false)
        .include_ignored(false)
        .exclude_submodules(true);
    let statuses = repo.statuses(Some(&mut opts))?;
    Ok(statuses.is_empty())
}

impl GitOps for Repository {
    fn workdir(&self) -> Option<&Path> {
        self.inner.workdir()
    }

    fn common_dir(&self) -> &Path {
        self.inner.commondir()
    }

    fn current_branch(&self) -> Result<String> {
        match self.inner.head() {
            Ok(head) => {
                if !head.is_branch() {
                    return Err(Error::DetachedHead);
                }
                head.shorthand()
                    .map(String::from)
                    .ok_or(Error::DetachedHead)
            }
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.inner.find_reference("HEAD")?;
                head.symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .map(String::from)
                    .ok_or(Error::DetachedHead)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn head_commit(&self) -> Result<Option<Oid>> {
        match self.inner.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn is_clean(&self) -> Result<bool> {
        status_is_clean(&self.inner)
    }

    fn require_clean_at(&self, path: &Path) -> Result<()> {
        let repo = git2::Repository::open(path)?;
        if status_is_clean(&repo)? {
            Ok(())
        } else {
            Err(Error::DirtyWorkingDirectory(path.display().to_string()))
        }
    }

    fn config_string(&self, key: &str) -> Result<Option<String>> {
        let config = self.inner.config()?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn current_identity(&self) -> Result<Identity> {
        let sig = self.inner.signature()?;
        Ok(Identity::from_signature(&sig))
    }

    // === Revisions ===

    fn resolve(&self, rev: &str) -> Result<Option<Oid>> {
        if rev.is_empty() {
            return Ok(None);
        }
        match self.inner.revparse_single(rev) {
            Ok(object) => match object.peel_to_commit() {
                Ok(commit) => Ok(Some(commit.id())),
                Err(e) if e.code() == ErrorCode::Peel => Ok(None),
                Err(e) => Err(e.into()),
            },
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(None),
            Err(e) if e.class() == git2::ErrorClass::Reference => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn object_exists(&self, oid: Oid) -> bool {
        self.inner.find_object(oid, None).is_ok()
    }

    fn is_ancestor(&self, ancestor: Oid, descendant: Oid) -> Result<bool> {
        if ancestor == descendant {
            return Ok(true);
        }
        Ok(self.inner.graph_descendant_of(descendant, ancestor)?)
    }

    fn ancestry_path(&self, from: Oid, to: Oid) -> Result<Vec<Oid>> {
        let mut on_path = std::collections::HashSet::from([from]);
        let mut result = Vec::new();

        for oid in self.history(to, Some(from), false)? {
            let commit = self.inner.find_commit(oid)?;
            if commit.parent_ids().any(|p| on_path.contains(&p)) {
                on_path.insert(oid);
                result.push(oid);
            }
        }

        Ok(result)
    }

    fn history(&self, tip: Oid, hide: Option<Oid>, first_parent: bool) -> Result<Vec<Oid>> {
        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        if first_parent {
            revwalk.simplify_first_parent()?;
        }
        revwalk.push(tip)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        revwalk.map(|oid| oid.map_err(Error::from)).collect()
    }

    fn commit_details(&self, oid: Oid) -> Result<CommitDetails> {
        let commit = self.inner.find_commit(oid)?;
        Ok(CommitDetails {
            tree: commit.tree_id(),
            parents: commit.parent_ids().collect(),
            author: Identity::from_signature(&commit.author()),
            committer: Identity::from_signature(&commit.committer()),
            message: String::from_utf8_lossy(commit.message_raw_bytes()).into_owned(),
        })
    }

    fn last_commit_changing(&self, path: &str, pattern: &str) -> Result<Option<Oid>> {
        let out = self
            .git()?
            .args(["log", "-1", "-G", pattern, "--format=%H", "--", path])
            .run()?;
        if out.is_empty() {
            return Ok(None);
        }
        Ok(Some(Oid::from_str(&out)?))
    }

    fn short_id(&self, oid: Oid) -> Result<String> {
        let object = self.inner.find_object(oid, None)?;
        let short = object.short_id()?;
        Ok(short.as_str().unwrap_or_default().to_string())
    }

    // === Objects ===

    fn subtree_at(&self, commit: Oid, path: &str) -> Result<Option<Oid>> {
        Ok(self
            .find_tree_entry(commit, path)?
            .filter(|entry| entry.kind() == Some(ObjectType::Tree))
            .map(|entry| entry.id()))
    }

    fn read_blob_at(&self, commit: Oid, path: &str) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self
            .find_tree_entry(commit, path)?
            .filter(|entry| entry.kind() == Some(ObjectType::Blob))
        else {
            return Ok(None);
        };
        let blob = self.inner.find_blob(entry.id())?;
        Ok(Some(blob.content().to_vec()))
    }

    fn tree_without(&self, tree: Oid, name: &str) -> Result<Oid> {
        let tree = self.inner.find_tree(tree)?;
        if tree.get_name(name).is_none() {
            return Ok(tree.id());
        }
        let mut builder = self.inner.treebuilder(Some(&tree))?;
        builder.remove(name)?;
        Ok(builder.write()?)
    }

    fn empty_tree(&self) -> Result<Oid> {
        Ok(self.inner.treebuilder(None)?.write()?)
    }

    fn write_commit(&self, commit: &NewCommit<'_>) -> Result<Oid> {
        let current = self.inner.signature()?;
        let author = match commit.author {
            Some(identity) => identity.to_signature()?,
            None => current.to_owned(),
        };
        let committer = match commit.committer {
            Some(identity) => identity.to_signature()?,
            None => current.to_owned(),
        };

        let tree = self.inner.find_tree(commit.tree)?;
        let parents = commit
            .parents
            .iter()
            .map(|oid| self.inner.find_commit(*oid))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        Ok(self.inner.commit(
            None,
            &author,
            &committer,
            commit.message,
            &tree,
            &parent_refs,
        )?)
    }

    // === Refs and Branches ===

    fn branch_exists(&self, name: &str) -> bool {
        self.inner.find_branch(name, BranchType::Local).is_ok()
    }

    fn create_branch_at(&self, name: &str, target: Oid) -> Result<()> {
        let commit = self.inner.find_commit(target)?;
        self.inner.branch(name, &commit, false)?;
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        match self.inner.find_branch(name, BranchType::Local) {
            Ok(mut branch) => Ok(branch.delete()?),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn update_ref(&self, name: &str, target: Oid) -> Result<()> {
        self.inner.reference(
            name,
            target,
            true, // force
            &format!("subrepo: update {name}"),
        )?;
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<()> {
        match self.inner.find_reference(name) {
            Ok(mut reference) => Ok(reference.delete()?),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Oid)>> {
        let mut refs = Vec::new();
        for reference in self.inner.references()? {
            let reference = reference?;
            let (Some(name), Some(target)) = (reference.name(), reference.target()) else {
                continue;
            };
            if name.starts_with(prefix) {
                refs.push((name.to_string(), target));
            }
        }
        refs.sort();
        Ok(refs)
    }

    // === Remote Operations ===

    fn fetch(&self, remote: &str, branch: Option<&str>) -> Result<Oid> {
        let mut cmd = self.git()?.args(["fetch", "--no-tags", "--quiet", remote]);
        if let Some(branch) = branch {
            cmd = cmd.arg(branch);
        }

        let command = cmd.command_line();
        let output = cmd.output()?;
        if !output.success() {
            if let Some(branch) = branch {
                if !self.remote_ref_exists(remote, branch)? {
                    return Err(Error::RemoteRefNotFound {
                        remote: remote.to_string(),
                        name: branch.to_string(),
                    });
                }
            }
            return Err(Error::CommandFailed {
                command,
                output: output.combined(),
            });
        }

        let sha = self.git()?.args(["rev-parse", "FETCH_HEAD^0"]).run()?;
        Ok(Oid::from_str(&sha)?)
    }

    fn remote_ref_exists(&self, remote: &str, name: &str) -> Result<bool> {
        let cmd = self
            .git()?
            .args(["ls-remote", "--exit-code", remote, name]);
        let command = cmd.command_line();
        let output = cmd.output()?;
        match output.code {
            Some(0) => Ok(true),
            // ls-remote reports "no matching refs" with exit status 2
            Some(2) => Ok(false),
            _ => Err(Error::CommandFailed {
                command,
                output: output.combined(),
            }),
        }
    }

    fn remote_head_branch(&self, remote: &str) -> Result<String> {
        let out = self.git()?.args(["ls-remote", "--symref", remote]).run()?;

        // ref: refs/heads/main	HEAD
        out.lines()
            .filter(|line| line.starts_with("ref:") && line.ends_with("HEAD"))
            .find_map(|line| {
                line.split_whitespace()
                    .nth(1)
                    .and_then(|r| r.strip_prefix("refs/heads/"))
                    .map(String::from)
            })
            .ok_or_else(|| Error::RemoteRefNotFound {
                remote: remote.to_string(),
                name: "HEAD".to_string(),
            })
    }

    fn push(
        &self,
        remote: &str,
        local_branch: &str,
        remote_branch: &str,
        force: bool,
    ) -> Result<()> {
        let mut cmd = self.git()?.arg("push");
        if force {
            cmd = cmd.arg("--force");
        }
        cmd.arg(remote)
            .arg(format!("{local_branch}:{remote_branch}"))
            .run()?;
        Ok(())
    }

    // === Worktrees ===

    fn add_worktree(&self, path: &Path, branch: &str) -> Result<()> {
        self.git()?
            .args(["worktree", "add", "--quiet"])
            .arg(path)
            .arg(branch)
            .run()?;
        Ok(())
    }

    fn remove_worktree(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            self.require_clean_at(path)?;
            fs::remove_dir_all(path)?;
        }
        // Also drops entries whose directory was deleted by hand
        self.git()?.args(["worktree", "prune"]).run()?;
        Ok(())
    }

    fn worktree_for_branch(&self, branch: &str) -> Result<Option<PathBuf>> {
        let out = self
            .git()?
            .args(["worktree", "list", "--porcelain"])
            .run()?;
        let wanted = format!("branch refs/heads/{branch}");

        let mut current: Option<PathBuf> = None;
        for line in out.lines() {
            if let Some(path) = line.strip_prefix("worktree ") {
                current = Some(PathBuf::from(path));
            } else if line == wanted {
                return Ok(current);
            }
        }
        Ok(None)
    }

    fn merge_in(&self, worktree: &Path, rev: &str) -> Result<JoinResult> {
        Self::join_in(GitCommand::new(worktree).args(["merge", "--no-edit", rev]))
    }

    fn rebase_in(&self, worktree: &Path, upstream: &str, branch: &str) -> Result<JoinResult> {
        Self::join_in(GitCommand::new(worktree).args(["rebase", upstream, branch]))
    }

    // === Index and Working Tree ===

    fn tracked_files(&self, path: &str) -> Result<Vec<String>> {
        let out = self.git()?.args(["ls-files", "--", path]).run()?;
        Ok(out.lines().map(String::from).collect())
    }

    fn remove_tracked(&self, path: &str) -> Result<()> {
        self.git()?.args(["rm", "-r", "-q", "--", path]).run()?;
        Ok(())
    }

    fn read_tree_into(&self, prefix: &str, commit: Oid) -> Result<()> {
        self.git()?
            .arg("read-tree")
            .arg(format!("--prefix={prefix}"))
            .arg("-u")
            .arg(commit.to_string())
            .run()?;
        Ok(())
    }

    fn stage_force(&self, path: &str) -> Result<()> {
        self.git()?.args(["add", "-f", "--", path]).run()?;
        Ok(())
    }

    fn commit_index(&self, message: &CommitMessage, edit: bool) -> Result<Oid> {
        if self.head_commit()?.is_some() {
            let mut cmd = self.git()?.args(["commit", "--quiet"]);
            if edit {
                cmd = cmd.arg("--edit");
            }
            cmd = match message {
                CommitMessage::Text(text) => cmd.args(["-m", text.as_str()]),
                CommitMessage::File(path) => cmd.arg("--file").arg(path),
            };
            if edit {
                cmd.run_attached()?;
            } else {
                cmd.run()?;
            }
            return self
                .head_commit()?
                .ok_or_else(|| Error::RefNotFound("HEAD".into()));
        }

        // No HEAD to commit on top of: build the root commit from the index.
        let text = match message {
            CommitMessage::Text(text) => text.clone(),
            CommitMessage::File(path) => fs::read_to_string(path)?,
        };
        let mut index = self.inner.index()?;
        index.read(true)?;
        let tree = self.inner.find_tree(index.write_tree()?)?;
        let sig = self.inner.signature()?;
        Ok(self
            .inner
            .commit(Some("HEAD"), &sig, &sig, &text, &tree, &[])?)
    }

    // === Config Files ===

    fn config_file_get(&self, file: &Path, key: &str) -> Result<Option<String>> {
        let config = git2::Config::open(file)?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn config_blob_get(&self, commit: Oid, path: &str, key: &str) -> Result<Option<String>> {
        let Some(entry) = self
            .find_tree_entry(commit, path)?
            .filter(|entry| entry.kind() == Some(ObjectType::Blob))
        else {
            return Ok(None);
        };

        let cmd = self.git()?.args([
            "config",
            "--blob",
            &entry.id().to_string(),
            "--get",
            key,
        ]);
        let command = cmd.command_line();
        let output = cmd.output()?;
        match output.code {
            Some(0) => Ok(Some(output.stdout.trim_end_matches('\n').to_string())),
            // git config exits with 1 when the key is not set
            Some(1) => Ok(None),
            _ => Err(Error::CommandFailed {
                command,
                output: output.combined(),
            }),
        }
    }

    fn config_file_set(&self, file: &Path, key: &str, value: &str) -> Result<()> {
        let mut config = git2::Config::open(file)?;
        config.set_str(key, value)?;
        Ok(())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.git_dir())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_test_repo() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }

        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/file.txt"), "content\n").unwrap();
        fs::write(temp.path().join("README"), "readme\n").unwrap();

        // Create initial commit (scoped to drop borrows before moving repo)
        {
            let sig = repo.signature().unwrap();
            let mut index = repo.index().unwrap();
            index
                .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
                .unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
                .unwrap();
        }

        let wrapped = Repository { inner: repo };
        (temp, wrapped)
    }

    fn commit_on_head(repo: &Repository, message: &str) -> Oid {
        let head = repo.head_commit().unwrap().unwrap();
        let tree = repo.commit_details(head).unwrap().tree;
        let oid = repo
            .write_commit(&NewCommit {
                tree,
                parents: &[head],
                message,
                author: None,
                committer: None,
            })
            .unwrap();
        let branch = repo.current_branch().unwrap();
        repo.update_ref(&format!("refs/heads/{branch}"), oid).unwrap();
        oid
    }

    #[test]
    fn test_current_branch() {
        let (_temp, repo) = init_test_repo();
        let branch = repo.current_branch().unwrap();
        assert!(branch == "main" || branch == "master");
    }

    #[test]
    fn test_unborn_head() {
        let temp = TempDir::new().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let repo = Repository::open(temp.path()).unwrap();

        assert_eq!(repo.head_commit().unwrap(), None);
        assert!(!repo.current_branch().unwrap().is_empty());
    }

    #[test]
    fn test_create_and_delete_branch() {
        let (_temp, repo) = init_test_repo();
        let head = repo.head_commit().unwrap().unwrap();

        repo.create_branch_at("subrepo/test", head).unwrap();
        assert!(repo.branch_exists("subrepo/test"));

        repo.delete_branch("subrepo/test").unwrap();
        assert!(!repo.branch_exists("subrepo/test"));
        // Deleting again is fine
        repo.delete_branch("subrepo/test").unwrap();
    }

    #[test]
    fn test_is_clean_ignores_untracked() {
        let (temp, repo) = init_test_repo();
        assert!(repo.is_clean().unwrap());

        fs::write(temp.path().join("untracked.txt"), "content").unwrap();
        assert!(repo.is_clean().unwrap());

        fs::write(temp.path().join("README"), "changed\n").unwrap();
        assert!(!repo.is_clean().unwrap());
    }

    #[test]
    fn test_resolve_missing_rev() {
        let (_temp, repo) = init_test_repo();
        assert!(repo.resolve("refs/subrepo/nope/fetch").unwrap().is_none());
        assert!(repo.resolve("").unwrap().is_none());
        assert!(repo.resolve("HEAD").unwrap().is_some());
    }

    #[test]
    fn test_subtree_and_blob_lookup() {
        let (_temp, repo) = init_test_repo();
        let head = repo.head_commit().unwrap().unwrap();

        assert!(repo.subtree_at(head, "sub").unwrap().is_some());
        assert!(repo.subtree_at(head, "README").unwrap().is_none());
        assert!(repo.subtree_at(head, "missing").unwrap().is_none());

        let blob = repo.read_blob_at(head, "sub/file.txt").unwrap().unwrap();
        assert_eq!(blob, b"content\n");
        assert!(repo.read_blob_at(head, "sub/nope").unwrap().is_none());
    }

    #[test]
    fn test_tree_without_entry() {
        let (_temp, repo) = init_test_repo();
        let head = repo.head_commit().unwrap().unwrap();
        let tree = repo.commit_details(head).unwrap().tree;

        let stripped = repo.tree_without(tree, "README").unwrap();
        assert_ne!(stripped, tree);
        assert_eq!(repo.tree_without(tree, "absent").unwrap(), tree);
    }

    #[test]
    fn test_empty_tree_is_canonical() {
        let (_temp, repo) = init_test_repo();
        assert_eq!(
            repo.empty_tree().unwrap().to_string(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }

    #[test]
    fn test_write_commit_keeps_given_author() {
        let (_temp, repo) = init_test_repo();
        let head = repo.head_commit().unwrap().unwrap();
        let tree = repo.commit_details(head).unwrap().tree;
        let author = Identity {
            name: "Original Author".into(),
            email: "author@example.com".into(),
            seconds: 1_000_000_000,
            offset_minutes: 60,
        };

        let oid = repo
            .write_commit(&NewCommit {
                tree,
                parents: &[head],
                message: "grafted\n",
                author: Some(&author),
                committer: None,
            })
            .unwrap();

        let details = repo.commit_details(oid).unwrap();
        assert_eq!(details.author, author);
        assert_eq!(details.committer.name, "Test User");
        assert_eq!(details.parents, vec![head]);
        assert_eq!(details.message, "grafted\n");
    }

    #[test]
    fn test_ancestry_path_and_is_ancestor() {
        let (_temp, repo) = init_test_repo();
        let first = repo.head_commit().unwrap().unwrap();
        let second = commit_on_head(&repo, "second");
        let third = commit_on_head(&repo, "third");

        assert_eq!(repo.ancestry_path(first, third).unwrap(), vec![second, third]);
        assert!(repo.is_ancestor(first, third).unwrap());
        assert!(repo.is_ancestor(third, third).unwrap());
        assert!(!repo.is_ancestor(third, first).unwrap());
    }

    #[test]
    fn test_list_and_delete_refs() {
        let (_temp, repo) = init_test_repo();
        let head = repo.head_commit().unwrap().unwrap();

        repo.update_ref("refs/subrepo/sub/fetch", head).unwrap();
        repo.update_ref("refs/subrepo/sub/commit", head).unwrap();
        repo.update_ref("refs/subrepo/other/fetch", head).unwrap();

        let refs = repo.list_refs("refs/subrepo/sub/").unwrap();
        assert_eq!(refs.len(), 2);

        repo.delete_ref("refs/subrepo/sub/fetch").unwrap();
        repo.delete_ref("refs/subrepo/sub/fetch").unwrap();
        assert_eq!(repo.list_refs("refs/subrepo/sub/").unwrap().len(), 1);
    }

    #[test]
    fn test_config_file_set() {
        let (temp, repo) = init_test_repo();
        let file = temp.path().join("sub/.gitrepo");
        fs::write(&file, "; header\n").unwrap();

        repo.config_file_set(&file, "subrepo.remote", "none").unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert!(content.starts_with("; header\n"));
        assert!(content.contains("[subrepo]"));
        assert!(content.contains("remote = none"));
    }

    #[test]
    fn test_config_file_get() {
        let (temp, repo) = init_test_repo();
        let file = temp.path().join(".gitrepo");
        fs::write(
            &file,
            "; comment\n[SubRepo]\n\tRemote = \"/path/with space\" ; note\n\tcommit = \n",
        )
        .unwrap();

        assert_eq!(
            repo.config_file_get(&file, "subrepo.remote").unwrap().as_deref(),
            Some("/path/with space")
        );
        assert_eq!(repo.config_file_get(&file, "subrepo.commit").unwrap().as_deref(), Some(""));
        assert_eq!(repo.config_file_get(&file, "subrepo.parent").unwrap(), None);
    }

    #[test]
    fn test_config_blob_get() {
        let (temp, repo) = init_test_repo();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(
            temp.path().join("sub/.gitrepo"),
            "[subrepo]\n\tremote = ../up\n\tbranch = main\n",
        )
        .unwrap();
        repo.stage_force("sub/.gitrepo").unwrap();
        let commit = repo
            .commit_index(&CommitMessage::Text("add descriptor".into()), false)
            .unwrap();

        assert_eq!(
            repo.config_blob_get(commit, "sub/.gitrepo", "subrepo.branch").unwrap().as_deref(),
            Some("main")
        );
        assert_eq!(repo.config_blob_get(commit, "sub/.gitrepo", "subrepo.commit").unwrap(), None);
        assert_eq!(repo.config_blob_get(commit, "other/.gitrepo", "subrepo.branch").unwrap(), None);
    }
}
