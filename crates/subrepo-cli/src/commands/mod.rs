//! CLI command definitions and implementations.

pub mod branch;
pub mod clean;
pub mod clone;
pub mod commit;
pub mod config;
pub mod fetch;
pub mod init;
pub mod pull;
pub mod push;
pub mod status;
pub mod utils;
pub mod version;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use subrepo_core::Method;

/// git-subrepo - embed another repository's history in a subdirectory.
#[derive(Parser)]
#[command(name = "git-subrepo", bin_name = "git subrepo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show as little output as possible
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show the steps of each command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show the git commands being run
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a repository as a subrepo in a subdirectory
    Clone {
        /// Upstream repository URL or path
        remote: String,

        /// Subdirectory to clone into (guessed from the remote when omitted)
        subdir: Option<String>,

        /// Upstream branch (default: the remote's HEAD branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Replace the content of an existing subrepo
        #[arg(short, long)]
        force: bool,

        /// How upstream changes are joined: merge or rebase
        #[arg(short = 'M', long, value_parser = parse_method)]
        method: Option<Method>,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Turn an existing subdirectory into a subrepo
    Init {
        /// Subdirectory to turn into a subrepo
        subdir: String,

        /// Upstream branch (default: init.defaultBranch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Upstream repository URL or path
        #[arg(short, long)]
        remote: Option<String>,

        /// How upstream changes are joined: merge or rebase
        #[arg(short = 'M', long, value_parser = parse_method)]
        method: Option<Method>,
    },

    /// Pull upstream changes into a subrepo
    Pull {
        /// Subrepo to pull
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        subdir: Option<String>,

        /// Pull every subrepo
        #[arg(short, long)]
        all: bool,

        /// Upstream branch to pull from
        #[arg(short, long)]
        branch: Option<String>,

        /// Start over from the upstream head (reclone)
        #[arg(short, long)]
        force: bool,

        /// Upstream repository to pull from
        #[arg(short, long)]
        remote: Option<String>,

        /// Record --branch/--remote in .gitrepo
        #[arg(short, long)]
        update: bool,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Push local subrepo changes upstream
    Push {
        /// Subrepo to push
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        subdir: Option<String>,

        /// Existing local branch to push instead of a fresh graft
        #[arg(requires = "subdir")]
        local_branch: Option<String>,

        /// Push every subrepo
        #[arg(short, long)]
        all: bool,

        /// Upstream branch to push to
        #[arg(short, long)]
        branch: Option<String>,

        /// Push even if upstream has changed since the last pull
        #[arg(short, long)]
        force: bool,

        /// Upstream repository to push to
        #[arg(short, long)]
        remote: Option<String>,

        /// Squash the local changes into one commit
        #[arg(short, long)]
        squash: bool,

        /// Record --branch/--remote in .gitrepo
        #[arg(short, long)]
        update: bool,

        /// Commit message for the host commit
        #[arg(short, long, conflicts_with = "file")]
        message: Option<String>,

        /// Read the host commit message from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Fetch a subrepo's upstream
    Fetch {
        /// Subrepo to fetch
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        subdir: Option<String>,

        /// Fetch every subrepo
        #[arg(short, long)]
        all: bool,

        /// Upstream branch to fetch
        #[arg(short, long)]
        branch: Option<String>,

        /// Fetch even if a subrepo worktree exists
        #[arg(short, long)]
        force: bool,

        /// Upstream repository to fetch from
        #[arg(short, long)]
        remote: Option<String>,
    },

    /// Create a branch holding the subrepo's history
    Branch {
        /// Subrepo to branch
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        subdir: Option<String>,

        /// Branch every subrepo
        #[arg(short, long)]
        all: bool,

        /// Fetch upstream first
        #[arg(short = 'F', long)]
        fetch: bool,

        /// Replace an existing subrepo branch
        #[arg(short, long)]
        force: bool,
    },

    /// Commit a subrepo branch back into the subdirectory
    Commit {
        /// Subrepo to commit into
        subdir: String,

        /// Ref to commit (default: subrepo/<subdir>)
        commit_ref: Option<String>,

        /// Fetch upstream first
        #[arg(short = 'F', long)]
        fetch: bool,

        /// Commit even if the ref does not contain upstream
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        message: MessageArgs,
    },

    /// Show the status of subrepos
    Status {
        /// Subrepos to show (default: all)
        subdirs: Vec<String>,

        /// Show every subrepo (the default)
        #[arg(short, long)]
        all: bool,

        /// Include nested subrepos
        #[arg(short = 'A', long = "ALL")]
        all_nested: bool,

        /// Fetch upstream first
        #[arg(short = 'F', long)]
        fetch: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the branch and worktree left by other commands
    Clean {
        /// Subrepo to clean
        #[arg(required_unless_present_any = ["all", "all_nested"], conflicts_with_all = ["all", "all_nested"])]
        subdir: Option<String>,

        /// Clean every subrepo
        #[arg(short, long)]
        all: bool,

        /// Clean every subrepo, nested ones included
        #[arg(short = 'A', long = "ALL")]
        all_nested: bool,

        /// Also delete the refs/subrepo/ refs
        #[arg(short, long)]
        force: bool,
    },

    /// Read or change a .gitrepo option
    Config {
        /// Subrepo to configure
        subdir: String,

        /// Option name: branch, cmdver, commit, method, remote or version
        option: String,

        /// New value (omit to read the current one)
        value: Option<String>,

        /// Allow changing autogenerated options
        #[arg(short, long)]
        force: bool,
    },

    /// Show the git-subrepo and git versions
    Version,

    /// Upgrade git-subrepo
    Upgrade,
}

/// Options controlling the host commit message.
#[derive(Args)]
pub struct MessageArgs {
    /// Open an editor on the commit message
    #[arg(short, long)]
    pub edit: bool,

    /// Commit message for the host commit
    #[arg(short, long, conflicts_with = "file")]
    pub message: Option<String>,

    /// Read the host commit message from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

fn parse_method(value: &str) -> Result<Method, String> {
    value
        .parse()
        .map_err(|_| "Not a valid method. Valid options are 'merge' or 'rebase'.".to_string())
}
