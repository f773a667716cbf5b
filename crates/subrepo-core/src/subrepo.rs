//! A subrepo with command-line overrides applied.

use std::path::{Path, PathBuf};

use subrepo_git::{GitOps, Oid};

use crate::context::{Intent, SyncState};
use crate::descriptor::{self, Descriptor, DescriptorUpdate, Method, NO_REMOTE};
use crate::error::{Error, Result};
use crate::refs::{self, RefNamespace};

/// Effective settings of one subrepo for one command.
///
/// Explicit `--remote`, `--branch` and `--method` win over the descriptor.
#[derive(Debug, Clone)]
pub struct Subrepo {
    /// Normalized subdirectory.
    pub subdir: String,
    /// Ref names of the subrepo.
    pub refs: RefNamespace,
    /// Descriptor as found on disk, `None` before the first clone or init.
    pub descriptor: Option<Descriptor>,
    /// Upstream remote.
    pub remote: String,
    /// Upstream branch.
    pub branch: String,
    /// Join method.
    pub method: Method,
}

impl Subrepo {
    /// Load an existing subrepo.
    ///
    /// # Errors
    /// Returns `NotASubrepo` if `subdir` has no descriptor.
    pub fn open<G: GitOps>(repo: &G, workdir: &Path, subdir: &str, intent: &Intent) -> Result<Self> {
        let subdir = refs::normalize_subdir(subdir)?;
        let descriptor = Descriptor::load(repo, workdir, &subdir)?;
        Self::build(subdir, Some(descriptor), intent)
    }

    /// Load a subrepo that may not have a descriptor yet.
    ///
    /// # Errors
    /// Returns error if the path is invalid or an existing descriptor is
    /// malformed.
    pub fn open_or_new<G: GitOps>(
        repo: &G,
        workdir: &Path,
        subdir: &str,
        intent: &Intent,
    ) -> Result<Self> {
        let subdir = refs::normalize_subdir(subdir)?;
        let descriptor = match Descriptor::load(repo, workdir, &subdir) {
            Ok(descriptor) => Some(descriptor),
            Err(Error::NotASubrepo(_)) => None,
            Err(e) => return Err(e),
        };
        Self::build(subdir, descriptor, intent)
    }

    fn build(subdir: String, descriptor: Option<Descriptor>, intent: &Intent) -> Result<Self> {
        let refs = RefNamespace::for_subdir(&subdir)?;
        let recorded = descriptor.as_ref();

        let remote = intent
            .remote
            .clone()
            .or_else(|| recorded.map(|d| d.remote.clone()))
            .unwrap_or_else(|| NO_REMOTE.to_string());
        let branch = intent
            .branch
            .clone()
            .or_else(|| recorded.map(|d| d.branch.clone()))
            .unwrap_or_default();
        let method = intent
            .method
            .or_else(|| recorded.map(|d| d.method))
            .unwrap_or_default();

        Ok(Self {
            subdir,
            refs,
            descriptor,
            remote,
            branch,
            method,
        })
    }

    /// Upstream commit recorded in the descriptor.
    #[must_use]
    pub fn recorded_commit(&self) -> Option<Oid> {
        self.descriptor.as_ref().and_then(|d| d.commit)
    }

    /// Host commit the last sync happened at.
    #[must_use]
    pub fn sync_parent(&self) -> Option<Oid> {
        self.descriptor.as_ref().and_then(Descriptor::sync_parent)
    }

    /// Check if there is an upstream to talk to.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote != NO_REMOTE
    }

    /// Descriptor path relative to the work tree.
    #[must_use]
    pub fn gitrepo_path(&self) -> PathBuf {
        PathBuf::from(Descriptor::relative_path(&self.subdir))
    }

    /// Branch to fetch, `None` for the remote's default.
    #[must_use]
    pub fn fetch_branch(&self) -> Option<&str> {
        if self.branch.is_empty() {
            None
        } else {
            Some(&self.branch)
        }
    }

    /// Fetch upstream, record it under the `fetch` ref and in `state`.
    ///
    /// # Errors
    /// Returns `NoRemote` for a subrepo without upstream, `RemoteRefNotFound`
    /// (from the backend) if the branch does not exist upstream.
    pub fn fetch<G: GitOps>(&self, repo: &G, state: &mut SyncState) -> Result<Oid> {
        if !self.has_remote() {
            return Err(Error::NoRemote(self.gitrepo_path()));
        }
        tracing::info!(subdir = %self.subdir, remote = %self.remote, branch = %self.branch, "fetching");
        let head = repo.fetch(&self.remote, self.fetch_branch())?;
        repo.update_ref(&self.refs.fetch(), head)?;
        state.upstream_head = Some(head);
        Ok(head)
    }

    /// Write the descriptor for this subrepo and stage it.
    ///
    /// # Errors
    /// Returns error if the file cannot be written or staged.
    pub fn write_descriptor<G: GitOps>(
        &self,
        repo: &G,
        workdir: &Path,
        intent: &Intent,
        state: &SyncState,
        merged_tip: Option<Oid>,
    ) -> Result<()> {
        descriptor::write(
            repo,
            workdir,
            &self.subdir,
            &DescriptorUpdate {
                remote: &self.remote,
                branch: &self.branch,
                method: self.method,
                rewrite_origin: intent.rewrites_origin(),
                upstream_head: state.upstream_head,
                merged_tip,
                host_head: state.host_head,
            },
        )
    }
}
