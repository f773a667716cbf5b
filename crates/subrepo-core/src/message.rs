//! Generated host commit messages.

use std::fmt::Write as _;

use subrepo_git::{GitOps, Oid};

use crate::context::CommandKind;
use crate::error::Result;

/// Values that go into a generated commit message.
#[derive(Debug, Clone)]
pub struct MessageFields<'a> {
    /// Command that produced the commit.
    pub command: CommandKind,
    /// Options and positional arguments as given.
    pub args: &'a [String],
    /// Subdirectory.
    pub subdir: &'a str,
    /// Ref that was merged, if any.
    pub merged: Option<Oid>,
    /// Whether the merged ref ends in a merge commit.
    pub merge_commit: bool,
    /// Upstream remote.
    pub remote: &'a str,
    /// Upstream branch.
    pub branch: &'a str,
    /// Upstream head being recorded.
    pub upstream: Option<Oid>,
}

/// Build the standard message describing a subrepo commit.
///
/// # Errors
/// Returns error if a commit id cannot be abbreviated.
pub fn generate<G: GitOps>(repo: &G, fields: &MessageFields<'_>) -> Result<String> {
    let short = |oid: Option<Oid>| -> Result<String> {
        match oid {
            Some(oid) => Ok(repo.short_id(oid)?),
            None => Ok("none".to_string()),
        }
    };

    let merge = if fields.merge_commit && fields.command != CommandKind::Push {
        " (merge)"
    } else {
        ""
    };

    let mut text = format!("git subrepo {}{merge}", fields.command);
    for arg in fields.args {
        text.push(' ');
        text.push_str(arg);
    }
    text.push_str("\n\n");

    let _ = writeln!(text, "subrepo:");
    let _ = writeln!(text, "  subdir:   \"{}\"", fields.subdir);
    let _ = writeln!(text, "  merged:   \"{}\"", short(fields.merged)?);
    let _ = writeln!(text, "upstream:");
    let _ = writeln!(text, "  origin:   \"{}\"", fields.remote);
    let _ = writeln!(text, "  branch:   \"{}\"", fields.branch);
    let _ = writeln!(text, "  commit:   \"{}\"", short(fields.upstream)?);
    let _ = writeln!(text, "git-subrepo:");
    let _ = writeln!(text, "  version:  \"{}\"", crate::VERSION);
    let _ = writeln!(text, "  origin:   \"???\"");
    let _ = writeln!(text, "  commit:   \"???\"");

    Ok(text)
}
