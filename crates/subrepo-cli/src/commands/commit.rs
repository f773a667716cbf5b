//! `git subrepo commit` command - Commit a subrepo branch into the host.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, commands};

use super::MessageArgs;
use super::utils::{self, Session};
use crate::output;

/// Run the commit command.
pub fn run(
    subdir: &str,
    commit_ref: Option<&str>,
    fetch: bool,
    force: bool,
    message: MessageArgs,
) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Commit)?;

    let positionals: Vec<&str> = std::iter::once(subdir).chain(commit_ref).collect();
    let mut intent = Intent::new(CommandKind::Commit);
    intent.message_args = utils::message_args(None, force, None, false, &positionals);
    intent.fetch = fetch;
    intent.force = force;
    intent.edit = message.edit;
    intent.message = utils::commit_message(message.message, message.file)?;

    let report = commands::commit(&repo, &intent, subdir, commit_ref)?;

    output::success(&format!(
        "Subrepo commit '{}' committed as",
        report.state.commit_ref.unwrap_or_default()
    ));
    output::detail(&format!(
        "  subdir '{}/' to branch '{}'.",
        report.subdir, report.state.host_branch
    ));
    Ok(())
}
