use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use subrepo_core::commands::list_subrepos;
use subrepo_core::{CommandKind, Outcome, Report, preflight};
use subrepo_git::{CommitMessage, Repository};

use crate::output;

/// Repository opened from the current directory, checked for `command`.
pub struct Session {
    pub repo: Repository,
    /// Directory the command was started from.
    pub start_dir: PathBuf,
}

/// Open the repository and run the checks every command starts with.
pub fn open_session(command: CommandKind) -> Result<Session> {
    let repo = Repository::open_current().context("Not inside a git repository")?;
    let start_dir = std::env::current_dir().context("Cannot read the current directory")?;
    preflight::check_repository(&repo, command, &start_dir)?;
    tracing::debug!(%command, dir = %start_dir.display(), "starting");
    Ok(Session { repo, start_dir })
}

/// Resolve `--message`/`--file` into a commit message.
pub fn commit_message(message: Option<String>, file: Option<PathBuf>) -> Result<Option<CommitMessage>> {
    if let Some(file) = file {
        if !file.is_file() {
            bail!("Commit msg file '{}' not found", file.display());
        }
        return Ok(Some(CommitMessage::File(file)));
    }
    Ok(message.map(CommitMessage::Text))
}

/// `--update` only makes sense together with a new branch or remote.
pub fn check_update(update: bool, branch: Option<&str>, remote: Option<&str>) -> Result<()> {
    if update && branch.is_none() && remote.is_none() {
        bail!("Can't use '--update' without '--branch' or '--remote'.");
    }
    Ok(())
}

/// Options and arguments as they appear in generated commit messages.
pub fn message_args(
    branch: Option<&str>,
    force: bool,
    remote: Option<&str>,
    update: bool,
    positionals: &[&str],
) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(branch) = branch {
        args.push(format!("--branch={branch}"));
    }
    if force {
        args.push("--force".to_string());
    }
    if let Some(remote) = remote {
        args.push(format!("--remote={remote}"));
    }
    if update {
        args.push("--update".to_string());
    }
    args.extend(positionals.iter().map(|arg| (*arg).to_string()));
    args
}

/// Subrepos a command runs on: the one given, or every tracked one.
pub fn target_subdirs(
    repo: &Repository,
    subdir: Option<String>,
    all: bool,
    include_nested: bool,
) -> Result<Vec<String>> {
    if all {
        return Ok(list_subrepos(repo, include_nested)?);
    }
    let Some(subdir) = subdir else {
        bail!("Command requires a subdir or '--all'");
    };
    Ok(vec![subdir])
}

/// Print the recovery recipe and fail if the command stopped on conflicts.
pub fn finish_pending(report: &Report, start_dir: &Path) -> Result<()> {
    if let Outcome::ConflictsPending(pending) = &report.outcome {
        output::conflict(pending, start_dir);
        bail!("");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_args_order() {
        let args = message_args(Some("dev"), true, Some("../up"), true, &["ext", "work"]);
        assert_eq!(
            args,
            vec!["--branch=dev", "--force", "--remote=../up", "--update", "ext", "work"]
        );
        assert!(message_args(None, false, None, false, &[]).is_empty());
    }

    #[test]
    fn test_update_needs_override() {
        assert!(check_update(true, None, None).is_err());
        assert!(check_update(true, Some("dev"), None).is_ok());
        assert!(check_update(false, None, None).is_ok());
    }

    #[test]
    fn test_missing_message_file() {
        let err = commit_message(None, Some(PathBuf::from("/no/such/file"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
        let msg = commit_message(Some("hello".into()), None).unwrap();
        assert_eq!(msg, Some(CommitMessage::Text("hello".into())));
    }
}
