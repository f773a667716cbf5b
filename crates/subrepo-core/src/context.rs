//! What a command was asked to do, and what it learned along the way.

use std::fmt;
use std::path::PathBuf;

use subrepo_git::{CommitMessage, Oid};

use crate::descriptor::Method;

/// Subrepo commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Clone,
    Init,
    Pull,
    Push,
    Fetch,
    Branch,
    Commit,
    Status,
    Clean,
    Config,
}

impl CommandKind {
    /// Name as typed on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Init => "init",
            Self::Pull => "pull",
            Self::Push => "push",
            Self::Fetch => "fetch",
            Self::Branch => "branch",
            Self::Commit => "commit",
            Self::Status => "status",
            Self::Clean => "clean",
            Self::Config => "config",
        }
    }

    /// Commands that refuse to start with uncommitted changes.
    #[must_use]
    pub const fn needs_clean_tree(self) -> bool {
        matches!(
            self,
            Self::Clone | Self::Init | Self::Pull | Self::Push | Self::Branch | Self::Commit
        )
    }

    /// Commands that may run while a subrepo worktree exists.
    #[must_use]
    pub const fn tolerates_worktree(self) -> bool {
        matches!(self, Self::Branch | Self::Clean | Self::Commit | Self::Push)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flags and overrides given for one invocation.
#[derive(Debug, Clone)]
pub struct Intent {
    /// Command being run.
    pub command: CommandKind,
    /// Run for every subrepo.
    pub all: bool,
    /// With `all`, include nested subrepos.
    pub all_nested: bool,
    /// `--force`.
    pub force: bool,
    /// `--fetch`.
    pub fetch: bool,
    /// `--squash`.
    pub squash: bool,
    /// `--update`.
    pub update: bool,
    /// `--edit`.
    pub edit: bool,
    /// Remote override.
    pub remote: Option<String>,
    /// Branch override.
    pub branch: Option<String>,
    /// Method override.
    pub method: Option<Method>,
    /// Commit message override.
    pub message: Option<CommitMessage>,
    /// Options and arguments echoed in generated commit messages.
    pub message_args: Vec<String>,
}

impl Intent {
    /// An intent with no flags set.
    #[must_use]
    pub const fn new(command: CommandKind) -> Self {
        Self {
            command,
            all: false,
            all_nested: false,
            force: false,
            fetch: false,
            squash: false,
            update: false,
            edit: false,
            remote: None,
            branch: None,
            method: None,
            message: None,
            message_args: Vec::new(),
        }
    }

    /// Whether `remote`/`branch` in an existing descriptor get overwritten.
    #[must_use]
    pub const fn rewrites_origin(&self) -> bool {
        let overridden = self.remote.is_some() || self.branch.is_some();
        overridden && (self.update || matches!(self.command, CommandKind::Push | CommandKind::Clone))
    }
}

/// State carried between the steps of one command on one subrepo.
///
/// Never reused across subrepos.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// Host branch checked out when the command started.
    pub host_branch: String,
    /// Host HEAD when the command started, `None` in an empty repository.
    pub host_head: Option<Oid>,
    /// Upstream head from the latest fetch.
    pub upstream_head: Option<Oid>,
    /// Ref whose content is being brought into the host.
    pub commit_ref: Option<String>,
    /// Worktree used by this command.
    pub worktree: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_origin() {
        let mut intent = Intent::new(CommandKind::Pull);
        assert!(!intent.rewrites_origin());

        intent.remote = Some("../other".into());
        assert!(!intent.rewrites_origin());

        intent.update = true;
        assert!(intent.rewrites_origin());

        let mut push = Intent::new(CommandKind::Push);
        push.branch = Some("dev".into());
        assert!(push.rewrites_origin());
    }

    #[test]
    fn test_command_tables() {
        assert!(CommandKind::Pull.needs_clean_tree());
        assert!(!CommandKind::Status.needs_clean_tree());
        assert!(CommandKind::Clean.tolerates_worktree());
        assert!(!CommandKind::Pull.tolerates_worktree());
        assert_eq!(CommandKind::Clone.to_string(), "clone");
    }
}
