//! `git subrepo fetch` command - Fetch subrepo upstreams.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, commands};

use super::utils::{self, Session};
use crate::output;

/// Run the fetch command.
pub fn run(
    subdir: Option<String>,
    all: bool,
    branch: Option<String>,
    force: bool,
    remote: Option<String>,
) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Fetch)?;

    let mut intent = Intent::new(CommandKind::Fetch);
    intent.all = all;
    intent.force = force;
    intent.branch = branch;
    intent.remote = remote;

    for subdir in utils::target_subdirs(&repo, subdir, all, false)? {
        let report = commands::fetch(&repo, &intent, &subdir)?;
        if report.state.upstream_head.is_some() {
            output::success(&format!(
                "Fetched '{}' from '{}' ({}).",
                report.subdir, report.remote, report.branch
            ));
        } else {
            output::warn(&format!("Ignored '{}', no remote.", report.subdir));
        }
    }
    Ok(())
}
