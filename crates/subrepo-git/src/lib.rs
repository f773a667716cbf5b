//! # subrepo-git
//!
//! Git backend for git-subrepo, built on git2-rs with the `git` command for
//! transport, worktrees and merges. Everything the subrepo engine does to a
//! repository goes through the [`GitOps`] trait.

mod command;
mod error;
mod refname;
mod repository;
mod traits;
mod types;

pub use command::{CommandOutput, GitCommand};
pub use error::{Error, Result};
pub use git2::Oid;
pub use refname::{is_valid_ref_name, normalize_ref_name};
pub use repository::Repository;
pub use traits::GitOps;
pub use types::{CommitDetails, CommitMessage, Identity, JoinResult, NewCommit};
