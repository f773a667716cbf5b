//! Plain data exchanged with the backend.

use std::path::PathBuf;

use git2::Oid;

/// A person and timestamp attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Seconds since the epoch.
    pub seconds: i64,
    /// Timezone offset in minutes.
    pub offset_minutes: i32,
}

impl Identity {
    pub(crate) fn from_signature(sig: &git2::Signature<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(sig.name_bytes()).into_owned(),
            email: String::from_utf8_lossy(sig.email_bytes()).into_owned(),
            seconds: sig.when().seconds(),
            offset_minutes: sig.when().offset_minutes(),
        }
    }

    pub(crate) fn to_signature(&self) -> Result<git2::Signature<'static>, git2::Error> {
        let when = git2::Time::new(self.seconds, self.offset_minutes);
        git2::Signature::new(&self.name, &self.email, &when)
    }
}

/// The parts of an existing commit the grafter needs.
#[derive(Debug, Clone)]
pub struct CommitDetails {
    /// Root tree.
    pub tree: Oid,
    /// Raw parent list, in order.
    pub parents: Vec<Oid>,
    /// Author identity and date.
    pub author: Identity,
    /// Committer identity and date.
    pub committer: Identity,
    /// Full message.
    pub message: String,
}

/// A commit to be written.
///
/// `None` identities mean "the current actor" from git config.
#[derive(Debug, Clone, Copy)]
pub struct NewCommit<'a> {
    pub tree: Oid,
    pub parents: &'a [Oid],
    pub message: &'a str,
    pub author: Option<&'a Identity>,
    pub committer: Option<&'a Identity>,
}

/// Where the message of an index commit comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMessage {
    /// Literal message text.
    Text(String),
    /// Read from a file (`git commit --file`).
    File(PathBuf),
}

/// Result of a merge or rebase run inside a worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinResult {
    /// The join completed.
    Clean,
    /// The join stopped; the worktree is left as git left it.
    Conflicted {
        /// Raw output of the failing command.
        output: String,
    },
}
