//! Error types for subrepo-git.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during git operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not inside a git repository.
    #[error("not a git repository")]
    NotARepository,

    /// Operation needs a working tree but the repository is bare.
    #[error("repository has no working tree")]
    BareRepository,

    /// Branch not found.
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Reference or revision not found.
    #[error("reference not found: {0}")]
    RefNotFound(String),

    /// The remote has no ref with the requested name.
    #[error("remote '{remote}' has no ref '{name}'")]
    RemoteRefNotFound {
        /// Remote URL or path.
        remote: String,
        /// Requested branch or ref.
        name: String,
    },

    /// HEAD is detached (not on a branch).
    #[error("HEAD is detached - checkout a branch first")]
    DetachedHead,

    /// A name could not be turned into a legal ref name.
    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    /// Working directory is dirty.
    #[error("working directory has uncommitted changes: {0}")]
    DirtyWorkingDirectory(String),

    /// A `git` command exited with a failure status.
    #[error("command failed: '{command}'\n{output}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Captured stdout and stderr.
        output: String,
    },

    /// The `git` executable could not be started.
    #[error("can't run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// Underlying git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

impl Error {
    /// Whether this error means the requested object or ref does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RefNotFound(_) | Self::BranchNotFound(_) | Self::RemoteRefNotFound { .. } => {
                true
            }
            Self::Git2(e) => e.code() == git2::ErrorCode::NotFound,
            _ => false,
        }
    }
}
