//! `config`: read or change one `.gitrepo` value.

use std::str::FromStr;

use subrepo_git::GitOps;

use crate::context::Intent;
use crate::descriptor::{Descriptor, Method};
use crate::error::{Error, Result};
use crate::preflight;
use crate::refs;

/// Options `config` knows about.
const OPTIONS: &[&str] = &["branch", "cmdver", "commit", "method", "remote", "version"];

/// Result of a config call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResult {
    /// Current value (empty if unset).
    Value(String),
    /// The value was written.
    Set(String),
}

/// Get `option` of a subrepo, or set it to `value`.
///
/// Everything but `method` is maintained by the tool and needs `--force`
/// to be set. The file is changed but not staged.
///
/// # Errors
/// Returns `InvalidOption` for unknown options, autogenerated options
/// without `--force`, and methods other than `merge`/`rebase`.
pub fn config<G: GitOps>(
    repo: &G,
    intent: &Intent,
    subdir: &str,
    option: &str,
    value: Option<&str>,
) -> Result<ConfigResult> {
    let workdir = preflight::work_tree(repo)?;
    let subdir = refs::normalize_subdir(subdir)?;
    Descriptor::load(repo, &workdir, &subdir)?;
    let path = workdir.join(Descriptor::relative_path(&subdir));

    if !OPTIONS.contains(&option) {
        return Err(Error::InvalidOption(format!("Option {option} not recognized")));
    }

    let Some(value) = value else {
        let current = repo
            .config_file_get(&path, &format!("subrepo.{option}"))?
            .unwrap_or_default();
        return Ok(ConfigResult::Value(current));
    };

    if option == "method" {
        if Method::from_str(value).is_err() {
            return Err(Error::InvalidOption(
                "Not a valid method. Valid options are 'merge' or 'rebase'.".into(),
            ));
        }
    } else if !intent.force {
        return Err(Error::InvalidOption(
            "This option is autogenerated, use '--force' to override.".into(),
        ));
    }

    repo.config_file_set(&path, &format!("subrepo.{option}"), value)?;
    tracing::debug!(subdir = %subdir, option, value, "config set");
    Ok(ConfigResult::Set(value.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::init;
    use crate::context::CommandKind;
    use crate::test_support::init_repo;

    #[test]
    fn test_get_and_set_method() {
        let (temp, repo) = init_repo();
        init(&repo, &Intent::new(CommandKind::Init), "sub").unwrap();
        let intent = Intent::new(CommandKind::Config);

        assert_eq!(
            config(&repo, &intent, "sub", "method", None).unwrap(),
            ConfigResult::Value("merge".into())
        );
        assert_eq!(
            config(&repo, &intent, "sub", "method", Some("rebase")).unwrap(),
            ConfigResult::Set("rebase".into())
        );
        assert_eq!(
            Descriptor::load(&repo, temp.path(), "sub").unwrap().method,
            Method::Rebase
        );

        let err = config(&repo, &intent, "sub", "method", Some("squash")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not a valid method. Valid options are 'merge' or 'rebase'."
        );
    }

    #[test]
    fn test_autogenerated_options_need_force() {
        let (_temp, repo) = init_repo();
        init(&repo, &Intent::new(CommandKind::Init), "sub").unwrap();
        let mut intent = Intent::new(CommandKind::Config);

        let err = config(&repo, &intent, "sub", "remote", Some("../x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This option is autogenerated, use '--force' to override."
        );
        let err = config(&repo, &intent, "sub", "colour", None).unwrap_err();
        assert_eq!(err.to_string(), "Option colour not recognized");

        intent.force = true;
        config(&repo, &intent, "sub", "remote", Some("../x")).unwrap();
        assert_eq!(
            config(&repo, &intent, "sub", "remote", None).unwrap(),
            ConfigResult::Value("../x".into())
        );
    }
}
