//! `git subrepo config` command - Read or change a `.gitrepo` option.

use anyhow::Result;
use subrepo_core::commands::{self, ConfigResult};
use subrepo_core::{CommandKind, Intent};

use super::utils::{self, Session};
use crate::output;

/// Run the config command.
pub fn run(subdir: &str, option: &str, value: Option<&str>, force: bool) -> Result<()> {
    let Session { repo, .. } = utils::open_session(CommandKind::Config)?;

    let mut intent = Intent::new(CommandKind::Config);
    intent.force = force;

    match commands::config(&repo, &intent, subdir, option, value)? {
        ConfigResult::Value(value) => output::essential(&format!(
            "Subrepo '{subdir}' option '{option}' has value '{value}'."
        )),
        ConfigResult::Set(value) => output::success(&format!(
            "Subrepo '{subdir}' option '{option}' set to '{value}'."
        )),
    }
    Ok(())
}
