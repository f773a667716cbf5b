//! `clone`: add an upstream repository as a new subdirectory.

use std::fs;
use std::path::Path;

use subrepo_git::GitOps;

use super::{Report, fresh_state};
use crate::context::{CommandKind, Intent, SyncState};
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::preflight;
use crate::publish;
use crate::subrepo::Subrepo;

/// Clone `remote` into `subdir` (guessed from the remote when absent).
///
/// With `--force` on an existing subrepo the content is replaced by the
/// current upstream head.
///
/// # Errors
/// Returns `SubdirNotEmpty` when the target has content, and fetch or
/// publish errors.
pub fn clone<G: GitOps>(
    repo: &G,
    intent: &Intent,
    remote: &str,
    subdir: Option<&str>,
) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subdir = match subdir {
        Some(subdir) => subdir.to_string(),
        None => guess_subdir(remote)?,
    };

    let mut intent = intent.clone();
    intent.remote = Some(remote.to_string());
    let mut subrepo = Subrepo::open_or_new(repo, &workdir, &subdir, &intent)?;
    preflight::check_worktree(repo, &subrepo.refs, &intent)?;
    let mut state = fresh_state(repo)?;

    if intent.force && subrepo.descriptor.is_some() {
        return reclone(repo, &workdir, &intent, subrepo, state);
    }

    ensure_empty(&workdir, &subrepo.subdir)?;
    if subrepo.branch.is_empty() {
        subrepo.branch = repo.remote_head_branch(&subrepo.remote)?;
        tracing::debug!(branch = %subrepo.branch, "upstream head branch");
    }
    let head = subrepo.fetch(repo, &mut state)?;

    fs::create_dir_all(workdir.join(&subrepo.subdir))?;
    state.commit_ref = Some(head.to_string());
    publish::publish_to_host(repo, &workdir, &subrepo, &intent, &state)?;

    Ok(Report::new(&subrepo, Outcome::Success, state))
}

/// Replace an existing subrepo's content with the upstream head.
pub(super) fn reclone<G: GitOps>(
    repo: &G,
    workdir: &Path,
    intent: &Intent,
    mut subrepo: Subrepo,
    mut state: SyncState,
) -> Result<Report> {
    tracing::info!(subdir = %subrepo.subdir, "--force indicates a reclone");
    if intent.command == CommandKind::Clone && intent.branch.is_none() {
        subrepo.branch = repo.remote_head_branch(&subrepo.remote)?;
    }
    let head = subrepo.fetch(repo, &mut state)?;

    if subrepo.recorded_commit() == Some(head) {
        tracing::debug!(%head, "already up to date");
        return Ok(Report::new(&subrepo, Outcome::UpToDate, state));
    }

    repo.remove_tracked(&subrepo.subdir)?;
    fs::create_dir_all(workdir.join(&subrepo.subdir))?;

    let mut intent = intent.clone();
    intent.branch = Some(subrepo.branch.clone());
    state.commit_ref = Some(head.to_string());
    publish::publish_to_host(repo, workdir, &subrepo, &intent, &state)?;

    let mut report = Report::new(&subrepo, Outcome::Success, state);
    report.recloned = true;
    Ok(report)
}

/// Subdirectory name for a clone: the last path component of the remote
/// without `.git`.
///
/// # Errors
/// Returns `InvalidSubdir` if that is not a plain name.
pub fn guess_subdir(remote: &str) -> Result<String> {
    let trimmed = remote.trim_end_matches('/');
    let base = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);
    let base = base.strip_suffix(".git").unwrap_or(base);

    let plain = !base.is_empty()
        && base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !plain {
        return Err(Error::InvalidSubdir(format!(
            "Can't determine subdir from '{remote}'."
        )));
    }
    Ok(base.to_string())
}

fn ensure_empty(workdir: &Path, subdir: &str) -> Result<()> {
    let path = workdir.join(subdir);
    if path.exists() && (!path.is_dir() || fs::read_dir(&path)?.next().is_some()) {
        return Err(Error::SubdirNotEmpty(subdir.to_string()));
    }
    Ok(())
}
