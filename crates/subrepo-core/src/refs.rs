//! Ref names owned by a subrepo.
//!
//! Every subrepo gets `refs/subrepo/<ref>/{fetch,branch,commit,push}` plus a
//! working branch `subrepo/<ref>`, where `<ref>` is the subdirectory path
//! encoded into a legal ref component.

use std::path::{Path, PathBuf};

use subrepo_git::{is_valid_ref_name, normalize_ref_name};

use crate::error::{Error, Result};

/// Durable refs and the working branch of one subrepo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefNamespace {
    subref: String,
}

impl RefNamespace {
    /// Build the namespace for a (normalized) subdirectory.
    ///
    /// # Errors
    /// Returns `InvalidSubdir` if no legal ref name can be derived.
    pub fn for_subdir(subdir: &str) -> Result<Self> {
        Ok(Self {
            subref: encode_subdir(subdir)?,
        })
    }

    /// The encoded subdirectory.
    #[must_use]
    pub fn subref(&self) -> &str {
        &self.subref
    }

    /// Prefix shared by the four durable refs.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("refs/subrepo/{}/", self.subref)
    }

    /// Last fetched upstream head.
    #[must_use]
    pub fn fetch(&self) -> String {
        format!("{}fetch", self.prefix())
    }

    /// Last grafted branch head.
    #[must_use]
    pub fn branch(&self) -> String {
        format!("{}branch", self.prefix())
    }

    /// Last commit merged into the host.
    #[must_use]
    pub fn commit(&self) -> String {
        format!("{}commit", self.prefix())
    }

    /// Last branch pushed upstream.
    #[must_use]
    pub fn push(&self) -> String {
        format!("{}push", self.prefix())
    }

    /// Short name of the working branch.
    #[must_use]
    pub fn branch_name(&self) -> String {
        format!("subrepo/{}", self.subref)
    }

    /// Full ref of the working branch.
    #[must_use]
    pub fn branch_ref(&self) -> String {
        format!("refs/heads/{}", self.branch_name())
    }

    /// Where the working branch gets checked out.
    #[must_use]
    pub fn worktree_path(&self, common_dir: &Path) -> PathBuf {
        common_dir.join("tmp").join(self.branch_name())
    }
}

/// Clean up a user-supplied subdirectory path.
///
/// Strips one leading `./` and trailing slashes and collapses repeated slashes.
///
/// # Errors
/// Returns `InvalidSubdir` for absolute or empty paths.
pub fn normalize_subdir(subdir: &str) -> Result<String> {
    let is_drive = subdir.len() >= 2 && subdir.as_bytes()[1] == b':';
    if subdir.starts_with('/') || is_drive {
        return Err(Error::InvalidSubdir(format!(
            "The subdir '{subdir}' should not be absolute path."
        )));
    }

    let normalized = subdir
        .strip_prefix("./")
        .unwrap_or(subdir)
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() || normalized == "." {
        return Err(Error::InvalidSubdir(format!(
            "Invalid subdir '{subdir}'."
        )));
    }
    Ok(normalized)
}

/// Encode a subdirectory path as a ref component.
///
/// Paths that are already legal are kept as is. Otherwise the characters and
/// sequences git refuses in ref names are percent-encoded.
///
/// # Errors
/// Returns `InvalidSubdir` if the result is still not a legal ref name.
pub fn encode_subdir(subdir: &str) -> Result<String> {
    if is_valid_ref_name(&format!("refs/heads/subrepo/{subdir}")) {
        return Ok(subdir.to_string());
    }

    let mut s = subdir.replace('%', "%25");

    // Segments starting with a dot and segments ending in .lock
    s = format!("/{s}/").replace("/.", "/%2e").replace(".lock/", "%2elock/");
    s = s.trim_matches('/').to_string();

    s = s
        .replace("..", "%2e%2e")
        .replace("%2e.", "%2e%2e")
        .replace(".%2e", "%2e%2e");

    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{1}'..='\u{1f}' | '\u{7f}' | ' ' | '~' | '^' | ':' | '?' | '*' | '[' => {
                escaped.push_str(&format!("%{:02x}", u32::from(c)));
            }
            _ => escaped.push(c),
        }
    }
    s = escaped;

    while s.contains("//") {
        s = s.replace("//", "/");
    }
    if s.ends_with('.') {
        s.pop();
        s.push_str("%2e");
    }
    s = s.replace("@{", "%40{").replace('\\', "%5c");

    let full = normalize_ref_name(&format!("refs/subrepo/{s}"))
        .map_err(|_| invalid_ref(subdir))?;
    let encoded = full
        .strip_prefix("refs/subrepo/")
        .ok_or_else(|| invalid_ref(subdir))?
        .to_string();

    if !is_valid_ref_name(&format!("refs/heads/subrepo/{encoded}")) {
        return Err(invalid_ref(subdir));
    }
    tracing::debug!(subdir, encoded = %encoded, "encoded subdir for ref names");
    Ok(encoded)
}

fn invalid_ref(subdir: &str) -> Error {
    Error::InvalidSubdir(format!("Can't make subrepo branch name from '{subdir}'."))
}
