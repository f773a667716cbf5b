//! `git subrepo clone` command - Add a repository as a subrepo.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, Method, Outcome, commands};

use super::MessageArgs;
use super::utils::{self, Session};
use crate::output;

/// Run the clone command.
pub fn run(
    remote: &str,
    subdir: Option<&str>,
    branch: Option<String>,
    force: bool,
    method: Option<Method>,
    message: MessageArgs,
) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Clone)?;

    let mut positionals = vec![remote];
    positionals.extend(subdir);

    let mut intent = Intent::new(CommandKind::Clone);
    intent.message_args = utils::message_args(branch.as_deref(), force, None, false, &positionals);
    intent.branch = branch;
    intent.force = force;
    intent.method = method;
    intent.edit = message.edit;
    intent.message = utils::commit_message(message.message, message.file)?;

    let report = commands::clone(&repo, &intent, remote, subdir)?;

    match report.outcome {
        Outcome::UpToDate => {
            output::success(&format!("Subrepo '{}' is up to date.", report.subdir));
        }
        _ if report.recloned => output::success(&format!(
            "Subrepo '{}' updated from '{}' ({}).",
            report.subdir, report.remote, report.branch
        )),
        _ => output::success(&format!(
            "Subrepo '{}' ({}) cloned into '{}'.",
            report.remote, report.branch, report.subdir
        )),
    }
    Ok(())
}
