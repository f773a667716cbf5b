//! `commit`: publish a subrepo branch into the host.

use subrepo_git::GitOps;

use super::{Report, fresh_state};
use crate::context::Intent;
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::preflight;
use crate::publish;
use crate::subrepo::Subrepo;

/// Commit `commit_ref` (default `subrepo/<ref>`) into the subdirectory.
///
/// Used to finish a pull after resolving conflicts by hand.
///
/// # Errors
/// Returns `NotReady` without a fetched upstream, and publish errors.
pub fn commit<G: GitOps>(
    repo: &G,
    intent: &Intent,
    subdir: &str,
    commit_ref: Option<&str>,
) -> Result<Report> {
    let workdir = preflight::work_tree(repo)?;
    let subrepo = Subrepo::open(repo, &workdir, subdir, intent)?;
    preflight::check_worktree(repo, &subrepo.refs, intent)?;
    let mut state = fresh_state(repo)?;

    if intent.fetch {
        subrepo.fetch(repo, &mut state)?;
    }
    let fetch_ref = subrepo.refs.fetch();
    let upstream = repo
        .resolve(&fetch_ref)?
        .ok_or_else(|| Error::NotReady(format!("Can't find ref '{fetch_ref}'. Try using -F.")))?;
    state.upstream_head = Some(upstream);
    state.commit_ref = Some(
        commit_ref
            .map_or_else(|| subrepo.refs.branch_name(), String::from),
    );

    publish::publish_to_host(repo, &workdir, &subrepo, intent, &state)?;
    Ok(Report::new(&subrepo, Outcome::Success, state))
}
