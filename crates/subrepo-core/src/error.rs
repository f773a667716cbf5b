//! Error types for subrepo-core.

use std::path::PathBuf;

use subrepo_git::Oid;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in subrepo-core operations.
///
/// Paused conflicts and no-op syncs are not errors; see
/// [`Outcome`](crate::Outcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The subdirectory has no `.gitrepo` descriptor.
    #[error("No '{}' file.", .0.display())]
    NotASubrepo(PathBuf),

    /// The recorded sync parent is not an ancestor of HEAD.
    #[error(
        "The last sync point (where upstream and the subrepo were equal) is not an ancestor.\n\
         This is usually caused by a rebase affecting that commit.\n\
         To recover set the subrepo parent in '{}'\n\
         to '{}'\n\
         and validate the subrepo by comparing with 'git subrepo branch {subdir}'",
        .gitrepo.display(),
        .hint.as_ref().map(ToString::to_string).unwrap_or_default()
    )]
    AncestorNotFound {
        /// The recorded parent.
        parent: Oid,
        /// Descriptor path.
        gitrepo: PathBuf,
        /// Subdirectory.
        subdir: String,
        /// Best guess for the correct parent.
        hint: Option<Oid>,
    },

    /// A recorded upstream commit is no longer part of upstream history.
    #[error(
        "Local repository does not contain {commit}. Try to 'git subrepo fetch {subdir}' \
         or add the '-F' flag to always fetch the latest content."
    )]
    HistoryRewritten {
        /// The unreachable upstream commit.
        commit: Oid,
        /// Subdirectory.
        subdir: String,
    },

    /// A working tree has uncommitted changes.
    #[error("Can't {command} subrepo. Working tree has changes. ({path})")]
    WorkingTreeDirty {
        /// Command being run.
        command: String,
        /// The dirty working tree.
        path: String,
    },

    /// Upstream moved since the last pull.
    #[error("There are new changes upstream, you need to pull first.")]
    UpstreamDiverged,

    /// The graft branch does not contain the upstream head.
    #[error("Can't commit: '{commit_ref}' doesn't contain upstream HEAD: {upstream}")]
    MissingUpstreamHead {
        /// Ref being published.
        commit_ref: String,
        /// Upstream head it should contain.
        upstream: Oid,
    },

    /// The subrepo has no upstream to talk to.
    #[error("Can't fetch subrepo. Remote is 'none' in '{}'.", .0.display())]
    NoRemote(PathBuf),

    /// A revision that must exist does not.
    #[error("Commit ref '{0}' does not exist.")]
    RefNotFound(String),

    /// A branch that must not exist does.
    #[error("Branch '{0}' already exists. Use '--force' to override.")]
    BranchExists(String),

    /// No branch to push.
    #[error("No subrepo branch '{0}' to push.")]
    NoBranchToPush(String),

    /// The walk produced no commit to build a branch from.
    #[error("No history found for subdir '{0}'.")]
    EmptyGraft(String),

    /// Subdirectory path cannot be used.
    #[error("{0}")]
    InvalidSubdir(String),

    /// Target subdirectory already has content.
    #[error("The subdir '{0}' exists and is not empty.")]
    SubdirNotEmpty(String),

    /// Precondition of the repository state failed.
    #[error("{0}")]
    NotReady(String),

    /// An option was used where it does not apply.
    #[error("{0}")]
    InvalidOption(String),

    /// Descriptor lacks a required key.
    #[error("Config value 'subrepo.{key}' not set in '{}'.", .path.display())]
    MissingKey {
        /// Config key.
        key: String,
        /// Descriptor path.
        path: PathBuf,
    },

    /// Descriptor value could not be interpreted.
    #[error("invalid value '{value}' for subrepo.{key}")]
    InvalidValue {
        /// Config key.
        key: String,
        /// Offending value.
        value: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by the git backend.
    #[error(transparent)]
    Backend(#[from] subrepo_git::Error),
}
