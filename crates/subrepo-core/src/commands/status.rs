//! `status`: what is known about each subrepo.

use std::path::PathBuf;

use serde::Serialize;
use subrepo_git::{GitOps, Oid};

use super::{fresh_state, list_subrepos};
use crate::context::Intent;
use crate::descriptor::Method;
use crate::error::{Error, Result};
use crate::preflight;
use crate::refs;
use crate::subrepo::Subrepo;

/// Status of one requested path.
#[derive(Debug, Clone, Serialize)]
pub struct StatusEntry {
    /// Subdirectory as requested.
    pub subdir: String,
    /// Details, `None` if the path is not a subrepo.
    pub subrepo: Option<SubrepoStatus>,
}

/// Details of one subrepo.
#[derive(Debug, Clone, Serialize)]
pub struct SubrepoStatus {
    pub remote: String,
    pub branch: String,
    pub method: Method,
    /// Working branch, if it exists.
    pub subrepo_branch: Option<String>,
    /// Last fetched upstream head.
    pub upstream_ref: Option<String>,
    pub pulled_commit: Option<String>,
    pub pull_parent: Option<String>,
    pub worktree: Option<PathBuf>,
    /// Durable refs that exist, with abbreviated targets.
    pub refs: Vec<RefEntry>,
}

/// One durable ref.
#[derive(Debug, Clone, Serialize)]
pub struct RefEntry {
    /// Role of the ref (`branch`, `commit`, `fetch`, `push`).
    pub kind: &'static str,
    pub name: String,
    pub commit: String,
}

/// Status of `subdirs`, or of every subrepo when none are given.
///
/// With `--fetch`, subrepos that have a remote are fetched first.
///
/// # Errors
/// Returns error if a descriptor is malformed or a fetch fails.
pub fn status<G: GitOps>(repo: &G, intent: &Intent, subdirs: &[String]) -> Result<Vec<StatusEntry>> {
    let workdir = preflight::work_tree(repo)?;
    let subdirs = if subdirs.is_empty() {
        list_subrepos(repo, intent.all_nested)?
    } else {
        subdirs.to_vec()
    };

    let mut entries = Vec::with_capacity(subdirs.len());
    for subdir in subdirs {
        let subrepo = match Subrepo::open(repo, &workdir, &subdir, intent) {
            Ok(subrepo) => subrepo,
            Err(Error::NotASubrepo(_)) => {
                entries.push(StatusEntry {
                    subdir,
                    subrepo: None,
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        if intent.fetch && subrepo.has_remote() {
            let mut state = fresh_state(repo)?;
            subrepo.fetch(repo, &mut state)?;
        }

        let details = describe(repo, &subrepo)?;
        entries.push(StatusEntry {
            subdir: refs::normalize_subdir(&subdir)?,
            subrepo: Some(details),
        });
    }
    Ok(entries)
}

fn describe<G: GitOps>(repo: &G, subrepo: &Subrepo) -> Result<SubrepoStatus> {
    let short = |oid: Option<Oid>| -> Result<Option<String>> {
        oid.map(|oid| repo.short_id(oid)).transpose().map_err(Error::from)
    };

    let branch_name = subrepo.refs.branch_name();
    let subrepo_branch = repo.branch_exists(&branch_name).then(|| branch_name.clone());
    let worktree = match &subrepo_branch {
        Some(branch) => repo.worktree_for_branch(branch)?,
        None => None,
    };

    let mut refs = Vec::new();
    for (kind, name) in [
        ("branch", subrepo.refs.branch()),
        ("commit", subrepo.refs.commit()),
        ("fetch", subrepo.refs.fetch()),
        ("push", subrepo.refs.push()),
    ] {
        if let Some(oid) = repo.resolve(&name)? {
            refs.push(RefEntry {
                kind,
                name,
                commit: repo.short_id(oid)?,
            });
        }
    }

    Ok(SubrepoStatus {
        remote: subrepo.remote.clone(),
        branch: subrepo.branch.clone(),
        method: subrepo.method,
        subrepo_branch,
        upstream_ref: short(repo.resolve(&subrepo.refs.fetch())?)?,
        pulled_commit: short(subrepo.recorded_commit())?,
        pull_parent: short(subrepo.sync_parent())?,
        worktree,
        refs,
    })
}
