// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone-or-pull of a single repository.
//!
//! ```text
//! SyncOperation::builder().url().root().branch()...build()
//!        |
//!        v
//!   run(runner) -- url/root empty --> fatal "git missing parameters"
//!        |
//!   mode Clone / CloneOrPull
//!        |
//!   <root>/.git exists? --yes--> (CloneOrPull) pull path --> Pulled
//!        | no                    (Clone)       --> Skipped
//!        v
//!   clone --> [credentials] --> [remotes, if org] --> [ignore_ts]
//!        --> Cloned
//!
//!   pull path: [revert_ts] --> pull
//! ```

use bon::Builder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::repo::{GitRepo, RemoteSetup};
use crate::core::process::ProcessRunner;
use crate::error::{GitError, MobResult};
use crate::logging::{LogContext, LogReason};

/// What a [`SyncOperation`] is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Clone if the root has no `.git`, otherwise do nothing.
    Clone,
    /// Pull unconditionally.
    Pull,
    /// Clone if the root has no `.git`, otherwise pull.
    #[default]
    CloneOrPull,
}

/// What a [`SyncOperation`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Pulled,
    /// Clone requested but the root already is a repository.
    Skipped,
}

/// One configured clone/pull of a repository.
///
/// Built once, consumed by [`SyncOperation::run`].
#[derive(Debug, Clone, Builder)]
pub struct SyncOperation {
    #[builder(into, default)]
    url: String,
    #[builder(into, default = String::from("master"))]
    branch: String,
    #[builder(into, default)]
    root: PathBuf,
    #[builder(default)]
    mode: SyncMode,
    /// Clone with `--depth 1`.
    #[builder(default)]
    shallow: bool,
    #[builder(into, default)]
    username: String,
    #[builder(into, default)]
    email: String,
    /// Mark tracked `*.ts` files assume-unchanged after cloning.
    #[builder(default)]
    ignore_ts_on_clone: bool,
    /// Revert tracked `*.ts` files before pulling.
    #[builder(default)]
    revert_ts_on_pull: bool,
    /// Rewire origin to a fork after cloning; skipped when the org is empty.
    remotes: Option<RemoteSetup>,
}

impl SyncOperation {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn mode(&self) -> SyncMode {
        self.mode
    }

    fn log_context(&self) -> LogContext {
        let mut ctx = self
            .root
            .file_name()
            .map_or_else(LogContext::default, |n| {
                LogContext::with_task(n.to_string_lossy())
            });
        ctx.set_tool("git");
        ctx
    }

    /// Runs the operation.
    ///
    /// # Errors
    ///
    /// Returns `GitError::MissingParameters` if the url or root is empty, or
    /// the first error raised by git.
    pub fn run(self, runner: &dyn ProcessRunner) -> MobResult<SyncOutcome> {
        let missing = if self.url.is_empty() {
            Some("url")
        } else if self.root.as_os_str().is_empty() {
            Some("root")
        } else {
            None
        };

        if let Some(missing) = missing {
            return Err(self.log_context().fatal(
                LogReason::Generic,
                GitError::MissingParameters { missing }.into(),
            ));
        }

        let repo = GitRepo::new(&self.root, runner);

        match self.mode {
            SyncMode::Clone => Ok(if self.do_clone(&repo)? {
                SyncOutcome::Cloned
            } else {
                SyncOutcome::Skipped
            }),
            SyncMode::Pull => {
                self.do_pull(&repo)?;
                Ok(SyncOutcome::Pulled)
            }
            SyncMode::CloneOrPull => {
                if self.do_clone(&repo)? {
                    Ok(SyncOutcome::Cloned)
                } else {
                    self.do_pull(&repo)?;
                    Ok(SyncOutcome::Pulled)
                }
            }
        }
    }

    /// Clones unless `<root>/.git` exists; returns whether it cloned.
    fn do_clone(&self, repo: &GitRepo<'_>) -> MobResult<bool> {
        let dot_git = self.root.join(".git");
        if dot_git.exists() {
            trace!(path = %dot_git.display(), "not cloning, already exists");
            return Ok(false);
        }

        repo.clone(&self.url, &self.branch, self.shallow)?;

        if !self.username.is_empty() || !self.email.is_empty() {
            repo.set_credentials(&self.username, &self.email)?;
        }

        if let Some(remotes) = &self.remotes
            && !remotes.org().is_empty()
        {
            repo.set_origin_and_upstream_remotes(remotes)?;
        }

        if self.ignore_ts_on_clone {
            let count = repo.ignore_ts(true)?;
            debug!(repo = %self.root.display(), count, "ignored .ts files");
        }

        Ok(true)
    }

    fn do_pull(&self, repo: &GitRepo<'_>) -> MobResult<()> {
        if self.revert_ts_on_pull {
            let count = repo.revert_ts()?;
            debug!(repo = %self.root.display(), count, "reverted .ts files");
        }

        repo.pull(&self.url, &self.branch)
    }
}

#[cfg(test)]
mod tests;
