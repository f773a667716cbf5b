//! # subrepo-core
//!
//! Core library for git-subrepo, the engine that keeps a subdirectory in
//! sync with an independent upstream repository.
//!
//! - [`descriptor`]: the `.gitrepo` file of each subrepo
//! - [`refs`]: ref names owned by a subrepo
//! - [`graft`]: building a branch of subdirectory-only commits from host history
//! - [`reconcile`]: merging or rebasing upstream into that branch
//! - [`publish`]: committing the result to the host, or pushing it upstream
//! - [`commands`]: the user-level workflows built from the above

pub mod commands;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod graft;
pub mod message;
pub mod outcome;
pub mod preflight;
pub mod publish;
pub mod reconcile;
pub mod refs;
pub mod rewrite;
pub mod subrepo;

#[cfg(test)]
mod test_support;

pub use commands::Report;
pub use context::{CommandKind, Intent, SyncState};
pub use descriptor::{Descriptor, Method};
pub use error::{Error, Result};
pub use outcome::{Outcome, PendingJoin};
pub use refs::RefNamespace;
pub use subrepo::Subrepo;

/// Version written to `cmdver` and shown by `git subrepo version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
