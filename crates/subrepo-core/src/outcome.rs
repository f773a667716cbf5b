//! Results of subrepo commands that are not errors.

use std::path::{Path, PathBuf};

use crate::context::CommandKind;
use crate::descriptor::Method;

/// How a command on one subrepo ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command did its work.
    Success,
    /// Upstream had nothing new.
    UpToDate,
    /// The graft matched upstream, nothing was pushed.
    NothingToPush,
    /// The join stopped on conflicts and needs to be finished by hand.
    ConflictsPending(PendingJoin),
}

/// A merge or rebase left unfinished in a subrepo worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJoin {
    /// Command that was interrupted.
    pub command: CommandKind,
    /// Subdirectory.
    pub subdir: String,
    /// Worktree holding the conflicts.
    pub worktree: PathBuf,
    /// Join method in effect.
    pub method: Method,
    /// Local branch holding the grafted history, pushed after the join.
    pub local_branch: String,
    /// Raw output of the failed join.
    pub output: String,
    /// Message file given with `--file`, passed on to the resume command.
    pub message_file: Option<PathBuf>,
}

impl PendingJoin {
    /// Instructions for finishing or abandoning the join by hand.
    #[must_use]
    pub fn recovery_steps(&self, start_dir: &Path) -> Vec<String> {
        let command = self.command.name();
        let worktree = self.worktree.display();
        let continue_step = match self.method {
            Method::Rebase => "git rebase --continue",
            Method::Merge => "git commit",
        };
        let resume = if self.command == CommandKind::Push {
            format!("git subrepo push {} {}", self.subdir, self.local_branch)
        } else {
            match &self.message_file {
                Some(file) => format!("git subrepo commit --file={} {}", file.display(), self.subdir),
                None => format!("git subrepo commit {}", self.subdir),
            }
        };

        let mut lines = vec![
            format!("You will need to finish the {command} by hand. A new working tree has been"),
            format!("created at {worktree} so that you can resolve the conflicts"),
            "shown in the output above.".to_string(),
            String::new(),
            "This is the common conflict resolution workflow:".to_string(),
            String::new(),
            format!("  1. cd {worktree}"),
            "  2. Resolve the conflicts (see \"git status\").".to_string(),
            "  3. \"git add\" the resolved files.".to_string(),
            format!("  4. {continue_step}"),
            "  5. If there are more conflicts, restart at step 2.".to_string(),
            format!("  6. cd {}", start_dir.display()),
            format!("  7. {resume}"),
        ];

        if self.command == CommandKind::Pull && self.method == Method::Rebase {
            lines.extend([
                String::new(),
                "After you have performed the steps above you can push your local changes".to_string(),
                "without repeating the rebase by:".to_string(),
                format!("  1. git subrepo push {} {}", self.subdir, self.local_branch),
            ]);
        }

        lines.extend([
            String::new(),
            format!("See \"git help {}\" for details.", self.method),
            String::new(),
            format!("Alternatively, you can abort the {command} and reset back to where you started:"),
            String::new(),
            format!("  1. git subrepo clean {}", self.subdir),
            String::new(),
            "See \"git help subrepo\" for more help.".to_string(),
        ]);
        lines
    }
}
