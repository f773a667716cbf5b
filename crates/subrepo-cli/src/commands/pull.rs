//! `git subrepo pull` command - Pull upstream changes into subrepos.

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, Outcome, commands};

use super::MessageArgs;
use super::utils::{self, Session};
use crate::output;

/// Options for the pull command.
pub struct Options {
    /// `None` with `--all`.
    pub subdir: Option<String>,
    pub branch: Option<String>,
    pub force: bool,
    pub remote: Option<String>,
    pub update: bool,
    pub message: MessageArgs,
}

/// Run the pull command.
pub fn run(opts: Options) -> Result<()> {
    let Session { repo, start_dir } = utils::open_session(CommandKind::Pull)?;
    utils::check_update(opts.update, opts.branch.as_deref(), opts.remote.as_deref())?;

    let positionals: Vec<&str> = opts.subdir.as_deref().into_iter().collect();
    let mut intent = Intent::new(CommandKind::Pull);
    intent.message_args = utils::message_args(
        opts.branch.as_deref(),
        opts.force,
        opts.remote.as_deref(),
        opts.update,
        &positionals,
    );
    intent.all = opts.subdir.is_none();
    intent.force = opts.force;
    intent.update = opts.update;
    intent.branch = opts.branch;
    intent.remote = opts.remote;
    intent.edit = opts.message.edit;
    intent.message = utils::commit_message(opts.message.message, opts.message.file)?;

    for subdir in utils::target_subdirs(&repo, opts.subdir, intent.all, false)? {
        let report = commands::pull(&repo, &intent, &subdir)?;
        utils::finish_pending(&report, &start_dir)?;

        match report.outcome {
            Outcome::UpToDate => {
                output::success(&format!("Subrepo '{}' is up to date.", report.subdir));
            }
            _ => output::success(&format!(
                "Subrepo '{}' pulled from '{}' ({}).",
                report.subdir, report.remote, report.branch
            )),
        }
    }
    Ok(())
}
