//! Thin runner for `git` subprocesses.
//!
//! Operations that git2 does not cover well (network transport with the
//! user's credential helpers, worktrees, merge/rebase with conflict markers,
//! index updates that must honor hooks) go through the `git` binary.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Captured result of a git invocation that is allowed to fail.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `None` if killed by a signal.
    pub code: Option<i32>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout and stderr joined, as shown to a user after a failure.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Builder for a single `git` invocation.
pub struct GitCommand {
    inner: Command,
    display: Vec<String>,
}

impl GitCommand {
    /// Start a `git` command running in `dir`.
    pub fn new(dir: &Path) -> Self {
        let mut inner = Command::new("git");
        inner.current_dir(dir);
        Self {
            inner,
            display: vec!["git".to_string()],
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.display
            .push(arg.as_ref().to_string_lossy().into_owned());
        self.inner.arg(arg);
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Set an environment variable for the child.
    #[must_use]
    pub fn env(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.inner.env(key, value);
        self
    }

    /// The command line, for diagnostics.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.display.join(" ")
    }

    /// Run and capture output without treating failure as an error.
    ///
    /// # Errors
    /// Returns error only if the process could not be spawned.
    pub fn output(mut self) -> Result<CommandOutput> {
        tracing::debug!(command = %self.command_line(), ">>>");
        let output = self.inner.output()?;
        Ok(output.into())
    }

    /// Run, requiring success, and return trimmed stdout.
    ///
    /// # Errors
    /// Returns `CommandFailed` with the captured output on a non-zero exit.
    pub fn run(self) -> Result<String> {
        let command = self.command_line();
        let output = self.output()?;
        if !output.success() {
            return Err(Error::CommandFailed {
                command,
                output: output.combined(),
            });
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Run attached to the terminal, so an editor can be opened.
    ///
    /// # Errors
    /// Returns `CommandFailed` on a non-zero exit.
    pub fn run_attached(mut self) -> Result<()> {
        let command = self.command_line();
        tracing::debug!(command = %command, ">>>");
        let status = self.inner.status()?;
        if !status.success() {
            return Err(Error::CommandFailed {
                command,
                output: String::new(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_captures_stdout() {
        let temp = TempDir::new().unwrap();
        let out = GitCommand::new(temp.path()).arg("--version").run().unwrap();
        assert!(out.starts_with("git version"));
    }

    #[test]
    fn test_failure_carries_command_line() {
        let temp = TempDir::new().unwrap();
        let err = GitCommand::new(temp.path())
            .args(["rev-parse", "--verify", "no-such-rev"])
            .run()
            .unwrap_err();

        match err {
            Error::CommandFailed { command, .. } => {
                assert_eq!(command, "git rev-parse --verify no-such-rev");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_combined_output() {
        let output = CommandOutput {
            code: Some(1),
            stdout: "out\n".into(),
            stderr: "err\n".into(),
        };
        assert!(!output.success());
        assert_eq!(output.combined(), "out\nerr");
    }
}
