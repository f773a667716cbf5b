//! `git subrepo status` command - Show what is known about each subrepo.

use anyhow::Result;
use colored::Colorize;
use subrepo_core::commands::{self, StatusEntry, SubrepoStatus};
use subrepo_core::{CommandKind, Intent};

use super::utils::{self, Session};
use crate::output;

/// Run the status command.
#[allow(clippy::fn_params_excessive_bools)]
pub fn run(subdirs: &[String], all_nested: bool, fetch: bool, json: bool, verbose: bool) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Status)?;

    let mut intent = Intent::new(CommandKind::Status);
    intent.all = subdirs.is_empty();
    intent.all_nested = all_nested;
    intent.fetch = fetch;

    let entries = commands::status(&repo, &intent, subdirs)?;

    if json {
        output::essential(&serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if subdirs.is_empty() {
        match entries.len() {
            0 => {
                output::info("No subrepos.");
                return Ok(());
            }
            1 => output::detail("1 subrepo:"),
            n => output::detail(&format!("{n} subrepos:")),
        }
        output::detail("");
    }
    print_entries(&entries, verbose);
    Ok(())
}

fn print_entries(entries: &[StatusEntry], verbose: bool) {
    for entry in entries {
        match &entry.subrepo {
            Some(status) => print_subrepo(&entry.subdir, status, verbose),
            None => output::warn(&format!("'{}' is not a subrepo", entry.subdir)),
        }
    }
}

fn print_subrepo(subdir: &str, status: &SubrepoStatus, verbose: bool) {
    output::detail(&format!("Git subrepo '{subdir}':"));
    if let Some(branch) = &status.subrepo_branch {
        output::detail(&format!("  Subrepo Branch:  {}", branch.cyan()));
    }
    output::detail(&format!("  Remote URL:      {}", status.remote));
    output::detail(&format!(
        "  Upstream Ref:    {}",
        output::or_none(status.upstream_ref.as_deref())
    ));
    output::detail(&format!("  Tracking Branch: {}", status.branch));
    output::detail(&format!("  Join Method:     {}", status.method));
    output::detail(&format!(
        "  Pulled Commit:   {}",
        output::or_none(status.pulled_commit.as_deref())
    ));
    output::detail(&format!(
        "  Pull Parent:     {}",
        output::or_none(status.pull_parent.as_deref())
    ));
    if let Some(worktree) = &status.worktree {
        output::detail(&format!("  Worktree:        {}", worktree.display()));
    }

    if verbose && !status.refs.is_empty() {
        output::detail("");
        output::detail("  Refs:");
        for entry in &status.refs {
            output::detail(&format!(
                "    {}  {:<6}  {}",
                entry.commit.yellow(),
                entry.kind,
                entry.name
            ));
        }
    }
    output::detail("");
}
