//! `git subrepo push` command - Push subrepo changes upstream.

use std::path::PathBuf;

use anyhow::Result;
use subrepo_core::{CommandKind, Intent, Outcome, commands};

use super::utils::{self, Session};
use crate::output;

/// Options for the push command.
pub struct Options {
    /// `None` with `--all`.
    pub subdir: Option<String>,
    pub local_branch: Option<String>,
    pub branch: Option<String>,
    pub force: bool,
    pub remote: Option<String>,
    pub squash: bool,
    pub update: bool,
    pub message: Option<String>,
    pub file: Option<PathBuf>,
}

/// Run the push command.
pub fn run(opts: Options) -> Result<()> {
    let Session { repo, start_dir } = utils::open_session(CommandKind::Push)?;
    utils::check_update(opts.update, opts.branch.as_deref(), opts.remote.as_deref())?;

    let positionals: Vec<&str> = opts
        .subdir
        .as_deref()
        .into_iter()
        .chain(opts.local_branch.as_deref())
        .collect();
    let mut intent = Intent::new(CommandKind::Push);
    intent.message_args = utils::message_args(
        opts.branch.as_deref(),
        opts.force,
        opts.remote.as_deref(),
        opts.update,
        &positionals,
    );
    intent.all = opts.subdir.is_none();
    intent.force = opts.force;
    intent.squash = opts.squash;
    intent.update = opts.update;
    intent.branch = opts.branch;
    intent.remote = opts.remote;
    intent.message = utils::commit_message(opts.message, opts.file)?;

    for subdir in utils::target_subdirs(&repo, opts.subdir, intent.all, false)? {
        let report = commands::push(&repo, &intent, &subdir, opts.local_branch.as_deref())?;
        utils::finish_pending(&report, &start_dir)?;

        match report.outcome {
            Outcome::NothingToPush => output::info(&format!(
                "Subrepo '{}' has no new commits to push.",
                report.subdir
            )),
            _ => output::success(&format!(
                "Subrepo '{}' pushed to '{}' ({}).",
                report.subdir, report.remote, report.branch
            )),
        }
    }
    Ok(())
}
