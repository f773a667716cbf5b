//! `git subrepo init` command - Turn a subdirectory into a subrepo.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, Method, commands};

use super::utils::{self, Session};
use crate::output;

/// Run the init command.
pub fn run(
    subdir: &str,
    branch: Option<String>,
    remote: Option<String>,
    method: Option<Method>,
) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Init)?;

    let mut intent = Intent::new(CommandKind::Init);
    intent.message_args =
        utils::message_args(branch.as_deref(), false, remote.as_deref(), false, &[subdir]);
    intent.branch = branch;
    intent.remote = remote;
    intent.method = method;

    let report = commands::init(&repo, &intent, subdir)?;

    if report.remote == "none" {
        output::success(&format!(
            "Subrepo created from '{}' (with no remote).",
            report.subdir
        ));
    } else {
        output::success(&format!(
            "Subrepo created from '{}' with remote '{}' ({}).",
            report.subdir, report.remote, report.branch
        ));
    }
    Ok(())
}
