//! Throwaway repositories for unit tests.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

use subrepo_git::{Oid, Repository};
use tempfile::TempDir;

/// Run git in `dir`, panicking on failure, and return trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure identity and disable signing so commits work anywhere.
pub fn configure(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Write a file, creating parent directories.
pub fn write_file(dir: &Path, path: &str, content: &str) {
    let path = dir.join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Stage everything and commit; returns the new HEAD.
pub fn commit_all(dir: &Path, message: &str) -> Oid {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "--allow-empty", "-m", message]);
    Oid::from_str(&git(dir, &["rev-parse", "HEAD"])).unwrap()
}

/// Stage everything and commit with a different author.
pub fn commit_as(dir: &Path, message: &str, author: &str) -> Oid {
    git(dir, &["add", "-A"]);
    let output = Command::new("git")
        .args(["commit", "-q", "-m", message])
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", "author@example.com")
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    Oid::from_str(&git(dir, &["rev-parse", "HEAD"])).unwrap()
}

/// A repository on branch `main` with `sub/file.txt` and `README` committed.
pub fn init_repo() -> (TempDir, Repository) {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "-q"]);
    git(temp.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure(temp.path());

    write_file(temp.path(), "sub/file.txt", "content\n");
    write_file(temp.path(), "README", "readme\n");
    commit_all(temp.path(), "Initial commit");

    let repo = Repository::open(temp.path()).unwrap();
    (temp, repo)
}

/// A bare upstream with one commit on `main` holding `files`.
pub fn init_upstream(files: &[(&str, &str)]) -> TempDir {
    let bare = TempDir::new().unwrap();
    git(bare.path(), &["init", "-q", "--bare"]);
    git(bare.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

    let seed = TempDir::new().unwrap();
    git(seed.path(), &["init", "-q"]);
    git(seed.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    configure(seed.path());
    for (path, content) in files {
        write_file(seed.path(), path, content);
    }
    commit_all(seed.path(), "upstream: initial");
    let url = bare.path().to_string_lossy().into_owned();
    git(seed.path(), &["push", "-q", &url, "main"]);

    bare
}

/// Clone `upstream`, add a commit, and push it back; returns the new head.
pub fn push_upstream_change(upstream: &Path, path: &str, content: &str) -> Oid {
    let work = TempDir::new().unwrap();
    let url = upstream.to_string_lossy().into_owned();
    git(work.path(), &["clone", "-q", &url, "."]);
    configure(work.path());
    write_file(work.path(), path, content);
    let head = commit_all(work.path(), &format!("upstream: change {path}"));
    git(work.path(), &["push", "-q", "origin", "HEAD:main"]);
    head
}
