//! Subrepo command workflows.
//!
//! Each command works on one subrepo and returns a [`Report`]. Running a
//! command for several subrepos is the caller's loop; every iteration starts
//! from a fresh [`SyncState`].

mod branch;
mod clean;
mod clone;
mod commit;
mod config;
mod fetch;
mod init;
mod pull;
mod push;
mod status;

pub use branch::branch;
pub use clean::{clean, clean_all_refs};
pub use clone::{clone, guess_subdir};
pub use commit::commit;
pub use config::{ConfigResult, config};
pub use fetch::fetch;
pub use init::init;
pub use pull::pull;
pub use push::push;
pub use status::{StatusEntry, SubrepoStatus, status};

use subrepo_git::GitOps;

use crate::context::SyncState;
use crate::descriptor::{GITREPO_FILE, Method};
use crate::error::Result;
use crate::outcome::Outcome;
use crate::subrepo::Subrepo;

/// What a command did to one subrepo.
#[derive(Debug, Clone)]
pub struct Report {
    /// Subdirectory.
    pub subdir: String,
    /// Upstream remote in effect.
    pub remote: String,
    /// Upstream branch in effect.
    pub branch: String,
    /// Join method in effect.
    pub method: Method,
    /// How the command ended.
    pub outcome: Outcome,
    /// State at the end of the command.
    pub state: SyncState,
    /// Clone replaced existing content.
    pub recloned: bool,
}

impl Report {
    fn new(subrepo: &Subrepo, outcome: Outcome, state: SyncState) -> Self {
        Self {
            subdir: subrepo.subdir.clone(),
            remote: subrepo.remote.clone(),
            branch: subrepo.branch.clone(),
            method: subrepo.method,
            outcome,
            state,
            recloned: false,
        }
    }
}

/// Host branch and HEAD as they are now.
fn fresh_state<G: GitOps>(repo: &G) -> Result<SyncState> {
    Ok(SyncState {
        host_branch: repo.current_branch()?,
        host_head: repo.head_commit()?,
        ..SyncState::default()
    })
}

/// Subdirectories of all tracked subrepos, sorted.
///
/// Subrepos nested inside another subrepo are left out unless
/// `include_nested` is set.
///
/// # Errors
/// Returns error if the index cannot be listed.
pub fn list_subrepos<G: GitOps>(repo: &G, include_nested: bool) -> Result<Vec<String>> {
    let suffix = format!("/{GITREPO_FILE}");
    let mut paths: Vec<String> = repo
        .tracked_files(".")?
        .into_iter()
        .filter_map(|path| path.strip_suffix(&suffix).map(String::from))
        .collect();
    paths.sort();

    let mut subrepos: Vec<String> = Vec::with_capacity(paths.len());
    for path in paths {
        let nested = subrepos
            .iter()
            .any(|outer| path.starts_with(&format!("{outer}/")));
        if include_nested || !nested {
            subrepos.push(path);
        }
    }
    Ok(subrepos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{commit_all, init_repo, write_file};

    #[test]
    fn test_list_subrepos_skips_nested() {
        let (temp, repo) = init_repo();
        for path in ["b/.gitrepo", "a/.gitrepo", "a/inner/.gitrepo", "c/x.gitrepo"] {
            write_file(temp.path(), path, "[subrepo]\nremote = none\n");
        }
        commit_all(temp.path(), "descriptors");

        assert_eq!(list_subrepos(&repo, false).unwrap(), vec!["a", "b"]);
        assert_eq!(
            list_subrepos(&repo, true).unwrap(),
            vec!["a", "a/inner", "b"]
        );
    }
}
