//! `init`: turn an existing subdirectory into a subrepo.

use subrepo_git::GitOps;

use super::{Report, fresh_state};
use crate::context::Intent;
use crate::descriptor::Descriptor;
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::preflight;
use crate::publish;
use crate::refs;
use crate::subrepo::Subrepo;

/// Branch recorded when neither `--branch` nor `init.defaultBranch` is set.
const FALLBACK_BRANCH: &str = "master";

/// Create `.gitrepo` for a subdirectory that is already part of the host.
///
/// # Errors
/// Returns `InvalidSubdir` if the directory is missing, untracked, or
/// already a subrepo.
pub fn init<G: GitOps>(repo: &G, intent: &Intent, subdir: &str) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subdir = refs::normalize_subdir(subdir)?;

    if !workdir.join(&subdir).is_dir() {
        return Err(Error::InvalidSubdir(format!(
            "The subdir '{subdir}' does not exist."
        )));
    }
    if workdir.join(Descriptor::relative_path(&subdir)).exists() {
        return Err(Error::InvalidSubdir(format!(
            "The subdir '{subdir}' is already a subrepo."
        )));
    }
    if repo.tracked_files(&subdir)?.is_empty() {
        return Err(Error::InvalidSubdir(format!(
            "The subdir '{subdir}' is not part of this repo."
        )));
    }

    let mut subrepo = Subrepo::open_or_new(repo, &workdir, &subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    if subrepo.branch.is_empty() {
        subrepo.branch = repo
            .config_string("init.defaultBranch")?
            .unwrap_or_else(|| FALLBACK_BRANCH.to_string());
    }

    let mut state = fresh_state(repo)?;
    let head = state
        .host_head
        .ok_or_else(|| Error::NotReady("HEAD does not exist".into()))?;
    state.commit_ref = Some(head.to_string());

    subrepo.write_descriptor(repo, &workdir, intent, &state, None)?;

    let merge_commit = repo.commit_details(head)?.parents.len() > 1;
    let message = publish::commit_message(repo, &subrepo, intent, &state, Some(head), merge_commit)?;
    repo.commit_index(&message, intent.edit)?;
    repo.update_ref(&subrepo.refs.commit(), head)?;

    tracing::info!(subdir = %subrepo.subdir, remote = %subrepo.remote, "initialized subrepo");
    Ok(Report::new(&subrepo, Outcome::Success, state))
}
