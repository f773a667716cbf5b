//! The `.gitrepo` descriptor kept in every subrepo directory.
//!
//! The file uses git's config syntax under a `[subrepo]` section and records
//! where the subdirectory comes from and the point where it was last in sync.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use subrepo_git::{GitOps, Oid};

use crate::error::{Error, Result};

/// Name of the descriptor file inside a subrepo directory.
pub const GITREPO_FILE: &str = ".gitrepo";

/// Remote value of a subrepo that has no upstream.
pub const NO_REMOTE: &str = "none";

/// Comment block at the top of every new descriptor file.
pub const HEADER: &str = "\
; DO NOT EDIT (unless you know what you are doing)
;
; This subdirectory is a git \"subrepo\", and this file is maintained by the
; git-subrepo command. See https://github.com/ingydotnet/git-subrepo#readme
;
";

/// How upstream changes are joined with local ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Merge upstream into the grafted branch.
    #[default]
    Merge,
    /// Rebase the grafted branch onto upstream.
    Rebase,
}

impl Method {
    /// Config value for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Rebase => "rebase",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            _ => Err(Error::InvalidValue {
                key: "method".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// Typed view of a `.gitrepo` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Upstream URL or path, or `none`.
    pub remote: String,
    /// Upstream branch.
    pub branch: String,
    /// Last upstream commit known to be in sync.
    pub commit: Option<Oid>,
    /// Host commit at which local and upstream were last equal.
    pub parent: Option<Oid>,
    /// Older name for `parent`.
    pub former: Option<Oid>,
    /// Join method.
    pub method: Method,
    /// Version of the tool that last wrote the file.
    pub cmdver: String,
}

impl Descriptor {
    /// Path of the descriptor for `subdir`, relative to the work tree.
    #[must_use]
    pub fn relative_path(subdir: &str) -> String {
        format!("{subdir}/{GITREPO_FILE}")
    }

    /// Load the descriptor of `subdir` from the work tree.
    ///
    /// # Errors
    /// Returns `NotASubrepo` if the file is absent, `MissingKey` without a
    /// `remote`, and `InvalidValue` for a commit id that is not 40 hex digits.
    pub fn load<G: GitOps>(repo: &G, workdir: &Path, subdir: &str) -> Result<Self> {
        let path = workdir.join(Self::relative_path(subdir));
        if !path.is_file() {
            return Err(Error::NotASubrepo(PathBuf::from(Self::relative_path(subdir))));
        }
        let get = |key: &str| repo.config_file_get(&path, &format!("subrepo.{key}"));

        let remote = get("remote")?.ok_or_else(|| Error::MissingKey {
            key: "remote".into(),
            path: path.clone(),
        })?;

        Ok(Self {
            remote,
            branch: get("branch")?.unwrap_or_default(),
            commit: parse_oid("commit", get("commit")?.as_deref())?,
            parent: parse_oid("parent", get("parent")?.as_deref())?,
            former: parse_oid("former", get("former")?.as_deref())?,
            method: match get("method")?.as_deref() {
                Some("rebase") => Method::Rebase,
                _ => Method::Merge,
            },
            cmdver: get("cmdver")?.unwrap_or_default(),
        })
    }

    /// Read the upstream commit recorded for `subdir` as of a past commit.
    ///
    /// Returns `None` when the descriptor did not exist yet, had no commit,
    /// or recorded something that is not a full commit id.
    ///
    /// # Errors
    /// Returns error if the blob lookup fails.
    pub fn commit_at<G: GitOps>(repo: &G, commit: Oid, subdir: &str) -> Result<Option<Oid>> {
        let value = repo.config_blob_get(commit, &Self::relative_path(subdir), "subrepo.commit")?;
        Ok(value
            .as_deref()
            .and_then(full_oid)
            .filter(|oid| !oid.is_zero()))
    }

    /// Check if the subrepo has an upstream at all.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote != NO_REMOTE
    }

    /// The recorded sync point, falling back to `former`.
    #[must_use]
    pub const fn sync_parent(&self) -> Option<Oid> {
        match self.parent {
            Some(parent) => Some(parent),
            None => self.former,
        }
    }
}

/// A commit id written out in full; abbreviations are not accepted.
fn full_oid(value: &str) -> Option<Oid> {
    let value = value.trim();
    if value.len() != 40 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    Oid::from_str(value).ok()
}

fn parse_oid(key: &str, value: Option<&str>) -> Result<Option<Oid>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => full_oid(value).map(Some).ok_or_else(|| Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Field values for a descriptor write.
#[derive(Debug, Clone)]
pub struct DescriptorUpdate<'a> {
    /// Remote to record.
    pub remote: &'a str,
    /// Branch to record.
    pub branch: &'a str,
    /// Method to record.
    pub method: Method,
    /// Rewrite `remote` and `branch` even in an existing file.
    pub rewrite_origin: bool,
    /// Upstream head being recorded as `commit`.
    pub upstream_head: Option<Oid>,
    /// Tip of the ref being merged into the host.
    pub merged_tip: Option<Oid>,
    /// Host HEAD before the command started.
    pub host_head: Option<Oid>,
}

/// Write the descriptor of `subdir` and stage it.
///
/// A missing file is restored from the host HEAD when it existed there, and
/// created from [`HEADER`] otherwise. `parent` is only touched when the merged
/// tip is exactly the upstream head, so the next sync resumes from here.
///
/// # Errors
/// Returns error if the file cannot be written or staged.
pub fn write<G: GitOps>(
    repo: &G,
    workdir: &Path,
    subdir: &str,
    update: &DescriptorUpdate<'_>,
) -> Result<()> {
    let relative = Descriptor::relative_path(subdir);
    let path = workdir.join(&relative);

    let mut new_file = false;
    if !path.exists() {
        let previous = match update.host_head {
            Some(head) => repo.read_blob_at(head, &relative)?,
            None => None,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match previous {
            Some(content) => {
                tracing::debug!(path = %relative, "restoring descriptor from HEAD");
                fs::write(&path, content)?;
            }
            None => {
                fs::write(&path, HEADER)?;
                new_file = true;
            }
        }
    }

    let set = |key: &str, value: &str| repo.config_file_set(&path, &format!("subrepo.{key}"), value);

    if new_file || update.rewrite_origin {
        set("remote", update.remote)?;
        set("branch", update.branch)?;
    }

    if new_file {
        set("commit", "")?;
        set("parent", "")?;
    }

    if let Some(upstream) = update.upstream_head {
        set("commit", &upstream.to_string())?;
        if update.merged_tip == Some(upstream) {
            let parent = update.host_head.map(|h| h.to_string()).unwrap_or_default();
            set("parent", &parent)?;
        }
    }

    set("method", update.method.as_str())?;
    set("cmdver", crate::VERSION)?;

    repo.stage_force(&relative)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{commit_all, init_repo};
    use std::str::FromStr;

    fn update<'a>(remote: &'a str, branch: &'a str) -> DescriptorUpdate<'a> {
        DescriptorUpdate {
            remote,
            branch,
            method: Method::Merge,
            rewrite_origin: false,
            upstream_head: None,
            merged_tip: None,
            host_head: None,
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::from_str("merge").unwrap(), Method::Merge);
        assert_eq!(Method::from_str("rebase").unwrap(), Method::Rebase);
        assert!(Method::from_str("squash").is_err());
        assert_eq!(Method::Rebase.to_string(), "rebase");
    }

    fn load_text(text: &str) -> Result<Descriptor> {
        let (temp, repo) = init_repo();
        fs::create_dir_all(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/.gitrepo"), text).unwrap();
        Descriptor::load(&repo, temp.path(), "sub")
    }

    #[test]
    fn test_load_defaults() {
        let d = load_text("[subrepo]\nremote = none\n").unwrap();
        assert!(!d.has_remote());
        assert_eq!(d.commit, None);
        assert_eq!(d.method, Method::Merge);
        assert_eq!(d.sync_parent(), None);
    }

    #[test]
    fn test_load_missing_remote() {
        let err = load_text("[subrepo]\nbranch = x\n").unwrap_err();
        assert!(matches!(err, Error::MissingKey { .. }));
    }

    #[test]
    fn test_load_follows_git_config_syntax() {
        let d = load_text("; DO NOT EDIT\n[SubRepo]\n\tRemote = \"/path/with space\" ; note\n\tbranch = main\n")
            .unwrap();
        assert_eq!(d.remote, "/path/with space");
        assert_eq!(d.branch, "main");
    }

    #[test]
    fn test_load_former_fallback() {
        let oid = "0123456789abcdef0123456789abcdef01234567";
        let d = load_text(&format!("[subrepo]\nremote = r\nformer = {oid}\nmethod = rebase\n")).unwrap();
        assert_eq!(d.sync_parent(), Some(Oid::from_str(oid).unwrap()));
        assert_eq!(d.method, Method::Rebase);
    }

    #[test]
    fn test_load_bad_commit() {
        let err = load_text("[subrepo]\nremote = r\ncommit = nothex\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_abbreviated_commit_is_rejected() {
        let err = load_text("[subrepo]\nremote = r\ncommit = 0123456\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "commit"));
        let err = load_text("[subrepo]\nremote = r\nparent = 0123456789abcdef\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "parent"));
    }

    #[test]
    fn test_load_missing_is_not_a_subrepo() {
        let (temp, repo) = init_repo();
        let err = Descriptor::load(&repo, temp.path(), "sub").unwrap_err();
        assert!(matches!(err, Error::NotASubrepo(_)));
    }

    #[test]
    fn test_new_file_round_trip() {
        let (temp, repo) = init_repo();
        write(&repo, temp.path(), "sub", &update("none", "master")).unwrap();

        let text = fs::read_to_string(temp.path().join("sub/.gitrepo")).unwrap();
        assert!(text.starts_with(HEADER));
        assert_eq!(HEADER.lines().count(), 5);

        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.remote, "none");
        assert_eq!(d.branch, "master");
        assert_eq!(d.commit, None);
        assert_eq!(d.parent, None);
        assert_eq!(d.method, Method::Merge);
        assert_eq!(d.cmdver, crate::VERSION);
    }

    #[test]
    fn test_parent_written_only_when_caught_up() {
        let (temp, repo) = init_repo();
        let head = repo.head_commit().unwrap().unwrap();
        let upstream = head;

        let mut fields = update("../up", "main");
        fields.upstream_head = Some(upstream);
        fields.merged_tip = None;
        fields.host_head = Some(head);
        write(&repo, temp.path(), "sub", &fields).unwrap();
        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.commit, Some(upstream));
        assert_eq!(d.parent, None);

        fields.merged_tip = Some(upstream);
        write(&repo, temp.path(), "sub", &fields).unwrap();
        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.parent, Some(head));
    }

    #[test]
    fn test_origin_kept_unless_rewritten() {
        let (temp, repo) = init_repo();
        write(&repo, temp.path(), "sub", &update("../first", "main")).unwrap();

        write(&repo, temp.path(), "sub", &update("../second", "dev")).unwrap();
        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.remote, "../first");
        assert_eq!(d.branch, "main");

        let mut fields = update("../second", "dev");
        fields.rewrite_origin = true;
        fields.method = Method::Rebase;
        write(&repo, temp.path(), "sub", &fields).unwrap();
        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.remote, "../second");
        assert_eq!(d.branch, "dev");
        assert_eq!(d.method, Method::Rebase);
    }

    #[test]
    fn test_missing_file_restored_from_head() {
        let (temp, repo) = init_repo();
        write(&repo, temp.path(), "sub", &update("../kept", "main")).unwrap();
        let head = commit_all(temp.path(), "add descriptor");

        fs::remove_file(temp.path().join("sub/.gitrepo")).unwrap();
        let mut fields = update("../ignored", "other");
        fields.host_head = Some(head);
        write(&repo, temp.path(), "sub", &fields).unwrap();

        let d = Descriptor::load(&repo, temp.path(), "sub").unwrap();
        assert_eq!(d.remote, "../kept");
    }

    #[test]
    fn test_commit_at_reads_history() {
        let (temp, repo) = init_repo();
        let before = repo.head_commit().unwrap().unwrap();

        let mut fields = update("../up", "main");
        fields.upstream_head = Some(before);
        write(&repo, temp.path(), "sub", &fields).unwrap();
        let after = commit_all(temp.path(), "record");

        assert_eq!(Descriptor::commit_at(&repo, before, "sub").unwrap(), None);
        assert_eq!(
            Descriptor::commit_at(&repo, after, "sub").unwrap(),
            Some(before)
        );
    }

    #[test]
    fn test_commit_at_ignores_abbreviated_id() {
        let (temp, repo) = init_repo();
        let head = repo.head_commit().unwrap().unwrap();
        write(&repo, temp.path(), "sub", &update("../up", "main")).unwrap();
        repo.config_file_set(
            &temp.path().join("sub/.gitrepo"),
            "subrepo.commit",
            &head.to_string()[..7],
        )
        .unwrap();
        let recorded = commit_all(temp.path(), "short id");

        assert_eq!(Descriptor::commit_at(&repo, recorded, "sub").unwrap(), None);
    }
}
