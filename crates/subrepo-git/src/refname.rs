//! Ref name checks delegated to libgit2's ref-format rules.

use git2::{Reference, ReferenceFormat};

use crate::error::{Error, Result};

/// Check if `name` (e.g. `refs/subrepo/foo/fetch`) is a legal full ref name.
#[must_use]
pub fn is_valid_ref_name(name: &str) -> bool {
    Reference::is_valid_name(name)
}

/// Normalize a ref name the way `git check-ref-format --normalize` does:
/// collapse repeated slashes and strip leading ones.
///
/// # Errors
/// Returns `InvalidRefName` if no legal name results.
pub fn normalize_ref_name(name: &str) -> Result<String> {
    Reference::normalize_name(name, ReferenceFormat::ALLOW_ONELEVEL)
        .map_err(|_| Error::InvalidRefName(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_ref_name("refs/subrepo/foo/fetch"));
        assert!(is_valid_ref_name("refs/heads/subrepo/a/b"));
        assert!(!is_valid_ref_name("refs/heads/subrepo/.dot"));
        assert!(!is_valid_ref_name("refs/heads/subrepo/spa ce"));
        assert!(!is_valid_ref_name("refs/heads/subrepo/x.lock"));
    }

    #[test]
    fn test_normalize_collapses_slashes() {
        assert_eq!(
            normalize_ref_name("refs/subrepo//a///b").unwrap(),
            "refs/subrepo/a/b"
        );
    }

    #[test]
    fn test_normalize_rejects_illegal() {
        assert!(normalize_ref_name("refs/subrepo/a..b").is_err());
    }
}
