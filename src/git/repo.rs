// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! A working tree and the git operations run inside it.
//!
//! ```text
//! GitRepo { root, runner }
//!   clone/pull/apply/fetch/checkout/init_repo/add_submodule
//!   set_credentials
//!   set_origin_and_upstream_remotes(&RemoteSetup)
//!       upstream exists? --> no-op
//!       git_file <-- remote get-url origin
//!       origin --> upstream  [push url nopushurl]
//!       origin  = url_pattern(org, git_file)
//!                 [remote.pushdefault] [puttykeyfile]
//!   ignore_ts(on) / revert_ts()   tracked *.ts only
//!
//! GitRepo::delete_directory(dir)
//!   not a repo             --> delete
//!   uncommitted / stashed  --> fatal, untouched (unless overridden)
//! ```

use bon::Builder;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};

use super::cmd;
use super::url::{UrlPattern, parse_git_file};
use crate::core::process::{ProcessBuilder, ProcessOutput, ProcessRunner};
use crate::error::{FsError, GitError, MobError, MobResult};
use crate::logging::{LogContext, LogReason};
use crate::utility::fs::remove::remove_dir_all;
use crate::utility::fs::walk::{WalkOptions, find_files};

/// Push url that makes every push to a remote fail.
pub const NO_PUSH_URL: &str = "nopushurl";

/// Glob matching generated translation files.
const TS_PATTERN: &str = "**/*.ts";

/// How `origin` is rewired to point at a fork.
#[derive(Debug, Clone, Builder)]
pub struct RemoteSetup {
    /// Organization (or user) owning the fork.
    #[builder(into)]
    org: String,
    /// `PuTTY` key file stored on the new remote.
    #[builder(into)]
    key: Option<PathBuf>,
    /// Set upstream's push url to [`NO_PUSH_URL`].
    #[builder(default)]
    no_push_upstream: bool,
    /// Make the new origin the default push remote.
    #[builder(default)]
    push_default_origin: bool,
    #[builder(default)]
    url_pattern: UrlPattern,
}

impl RemoteSetup {
    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    #[must_use]
    pub fn key(&self) -> Option<&Path> {
        self.key.as_deref()
    }

    #[must_use]
    pub const fn no_push_upstream(&self) -> bool {
        self.no_push_upstream
    }

    #[must_use]
    pub const fn push_default_origin(&self) -> bool {
        self.push_default_origin
    }

    #[must_use]
    pub const fn url_pattern(&self) -> &UrlPattern {
        &self.url_pattern
    }
}

/// A working tree bound to the runner that executes its git commands.
pub struct GitRepo<'r> {
    root: PathBuf,
    runner: &'r dyn ProcessRunner,
}

impl fmt::Debug for GitRepo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitRepo").field("root", &self.root).finish()
    }
}

impl<'r> GitRepo<'r> {
    pub fn new(root: impl Into<PathBuf>, runner: &'r dyn ProcessRunner) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput> {
        self.runner.run(process)
    }

    fn log_context(&self) -> LogContext {
        let name = self
            .root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mut ctx = LogContext::with_task(name);
        ctx.set_tool("git");
        ctx
    }

    // --- pass-through operations ---

    /// Clones `url` at `branch` into the root.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn clone(&self, url: &str, branch: &str, shallow: bool) -> MobResult<()> {
        info!(repo = %self.root.display(), url, branch, shallow, "cloning");
        self.run(&cmd::clone(&self.root, url, branch, shallow))?;
        Ok(())
    }

    /// Pulls `branch` from `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn pull(&self, url: &str, branch: &str) -> MobResult<()> {
        info!(repo = %self.root.display(), url, branch, "pulling");
        self.run(&cmd::pull(&self.root, url, branch))?;
        Ok(())
    }

    /// Applies a diff to the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the diff does not apply.
    pub fn apply(&self, diff: &str) -> MobResult<()> {
        self.run(&cmd::apply(&self.root, diff))?;
        Ok(())
    }

    /// Fetches `branch` from `remote`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn fetch(&self, remote: &str, branch: &str) -> MobResult<()> {
        self.run(&cmd::fetch(&self.root, remote, branch))?;
        Ok(())
    }

    /// Checks out a branch, tag or commit.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn checkout(&self, what: &str) -> MobResult<()> {
        self.run(&cmd::checkout(&self.root, what))?;
        Ok(())
    }

    /// Creates the root if needed and runs `git init` in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or git fails.
    pub fn init_repo(&self) -> MobResult<()> {
        if !self.runner.is_dry() {
            std::fs::create_dir_all(&self.root).map_err(|source| FsError::IoError {
                path: self.root.display().to_string(),
                source,
            })?;
        }
        self.run(&cmd::init(&self.root))?;
        Ok(())
    }

    /// Adds `url` as submodule `name` tracking `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn add_submodule(&self, branch: &str, name: &str, url: &str) -> MobResult<()> {
        info!(repo = %self.root.display(), submodule = name, branch, "adding submodule");
        self.run(&cmd::add_submodule(&self.root, branch, name, url))?;
        Ok(())
    }

    // --- configuration ---

    /// Sets `git config <key> <value>` in this repository.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn set_config(&self, key: &str, value: &str) -> MobResult<()> {
        self.run(&cmd::set_config(&self.root, key, value))?;
        Ok(())
    }

    /// Sets `user.name` and `user.email`. Empty values are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn set_credentials(&self, username: &str, email: &str) -> MobResult<()> {
        debug!(repo = %self.root.display(), username, email, "setting up credentials");

        if !username.is_empty() {
            self.set_config("user.name", username)?;
        }
        if !email.is_empty() {
            self.set_config("user.email", email)?;
        }
        Ok(())
    }

    /// Renames `origin` to `upstream` and adds a new `origin` pointing at the
    /// fork described by `setup`.
    ///
    /// Does nothing if `upstream` already exists, so running it twice leaves
    /// the remotes as after the first run.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or origin's url has no repository file name.
    pub fn set_origin_and_upstream_remotes(&self, setup: &RemoteSetup) -> MobResult<()> {
        if self.runner.is_dry() && !self.root.is_dir() {
            debug!(repo = %self.root.display(), "(dry) no work tree, skipping remotes");
            return Ok(());
        }

        if self.has_remote("upstream")? {
            trace!(repo = %self.root.display(), "upstream remote already exists");
            return Ok(());
        }

        // origin is renamed below, grab its file name first
        let git_file = self.git_file()?;

        debug!(repo = %self.root.display(), "renaming origin to upstream");
        self.run(&cmd::rename_remote(&self.root, "origin", "upstream"))?;

        if setup.no_push_upstream() {
            debug!(repo = %self.root.display(), "disabling push to upstream");
            self.run(&cmd::set_remote_push(&self.root, "upstream", NO_PUSH_URL))?;
        }

        self.add_remote(
            "origin",
            setup.org(),
            setup.key(),
            setup.push_default_origin(),
            setup.url_pattern(),
            Some(&git_file),
        )
    }

    /// Adds remote `name` for `org`, unless it already exists.
    ///
    /// The url is built from `url_pattern`, `org` and `git_file`, which
    /// defaults to origin's repository file name.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails or origin's url cannot be parsed.
    pub fn add_remote(
        &self,
        name: &str,
        org: &str,
        key: Option<&Path>,
        push_default: bool,
        url_pattern: &UrlPattern,
        git_file: Option<&str>,
    ) -> MobResult<()> {
        if self.has_remote(name)? {
            debug!(repo = %self.root.display(), remote = name, "remote already exists");
            return Ok(());
        }

        let git_file = match git_file {
            Some(file) => file.to_string(),
            None => self.git_file()?,
        };
        let url = url_pattern.url(org, &git_file);

        debug!(repo = %self.root.display(), remote = name, url, "adding remote");
        self.run(&cmd::add_remote(&self.root, name, &url))?;

        if push_default {
            trace!(repo = %self.root.display(), remote = name, "setting as push default");
            self.set_config("remote.pushdefault", name)?;
        }

        if let Some(key) = key {
            self.set_config(
                &format!("remote.{name}.puttykeyfile"),
                &key.to_string_lossy(),
            )?;
        }

        Ok(())
    }

    /// Repository file name of `origin`, such as `modorganizer.git`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::BadRemoteUrl` if the url has no `/` or nothing after it.
    pub fn git_file(&self) -> MobResult<String> {
        let output = self.run(&cmd::remote_url(&self.root))?;
        parse_git_file(output.stdout()).map_err(|e| {
            error!(repo = %self.root.display(), "{e}");
            e.into()
        })
    }

    // --- queries ---

    /// Whether remote `name` is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn has_remote(&self, name: &str) -> MobResult<bool> {
        Ok(self.run(&cmd::has_remote(&self.root, name))?.success())
    }

    /// Whether `file` (relative to the root) is in the index.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn is_tracked(&self, file: &Path) -> MobResult<bool> {
        Ok(self.run(&cmd::is_tracked(&self.root, file))?.success())
    }

    /// Whether the root is inside a git work tree. A missing root is not.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn is_git_repo(&self) -> MobResult<bool> {
        if !self.root.is_dir() {
            return Ok(false);
        }
        Ok(self.run(&cmd::is_repo(&self.root))?.success())
    }

    /// Name of the checked out branch, empty when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn current_branch(&self) -> MobResult<String> {
        let output = self.run(&cmd::current_branch(&self.root))?;
        Ok(output.stdout().trim().to_string())
    }

    /// Whether `git status` reports anything at all.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn has_uncommitted_changes(&self) -> MobResult<bool> {
        let output = self.run(&cmd::has_uncommitted_changes(&self.root))?;
        Ok(!output.stdout().is_empty())
    }

    /// Whether a stash exists.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn has_stashed_changes(&self) -> MobResult<bool> {
        Ok(self.run(&cmd::has_stashed_changes(&self.root))?.success())
    }

    // --- generated translation files ---

    /// Every `*.ts` file in the work tree, relative to the root.
    fn ts_files(&self) -> MobResult<Vec<PathBuf>> {
        // a dry clone leaves no work tree behind
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let files = find_files(&self.root, TS_PATTERN, &WalkOptions::for_work_tree())
            .map_err(|e| MobError::Other(format!("{e:#}").into_boxed_str()))?;

        Ok(files
            .into_iter()
            .filter_map(|f| f.strip_prefix(&self.root).ok().map(Path::to_path_buf))
            .collect())
    }

    /// Sets or clears assume-unchanged on every tracked `*.ts` file.
    ///
    /// Returns the number of files changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be walked or git fails.
    pub fn ignore_ts(&self, on: bool) -> MobResult<usize> {
        let mut count = 0;

        for file in self.ts_files()? {
            if !self.is_tracked(&file)? {
                trace!(repo = %self.root.display(), file = %file.display(), "(skipping, not tracked)");
                continue;
            }

            trace!(
                repo = %self.root.display(),
                file = %file.display(),
                "{}",
                if on { "ignoring" } else { "un-ignoring" }
            );
            self.run(&cmd::set_assume_unchanged(&self.root, &file, on))?;
            count += 1;
        }

        Ok(count)
    }

    /// Discards local changes to every tracked `*.ts` file.
    ///
    /// Returns the number of files reverted.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be walked or git fails.
    pub fn revert_ts(&self) -> MobResult<usize> {
        let mut count = 0;

        for file in self.ts_files()? {
            if !self.is_tracked(&file)? {
                debug!(repo = %self.root.display(), file = %file.display(), "won't try to revert, not tracked");
                continue;
            }

            trace!(repo = %self.root.display(), file = %file.display(), "reverting");
            self.run(&cmd::revert(&self.root, &file))?;
            count += 1;
        }

        Ok(count)
    }

    // --- associated operations ---

    /// Recursively deletes `dir`.
    ///
    /// A directory that is not a git repository is always deleted. A
    /// repository with uncommitted or stashed changes is left untouched and
    /// an error is returned, unless `ignore_uncommitted` is set.
    ///
    /// # Errors
    ///
    /// Returns `GitError::UncommittedChanges` or `GitError::StashedChanges`
    /// when the guard refuses, or an error if git or the delete fails.
    pub fn delete_directory(
        dir: &Path,
        runner: &dyn ProcessRunner,
        ignore_uncommitted: bool,
    ) -> MobResult<()> {
        let repo = GitRepo::new(dir, runner);

        if !ignore_uncommitted && repo.is_git_repo()? {
            let path = dir.display().to_string();

            if repo.has_uncommitted_changes()? {
                return Err(repo.log_context().fatal(
                    LogReason::Redownload,
                    GitError::UncommittedChanges { path }.into(),
                ));
            }

            if repo.has_stashed_changes()? {
                return Err(repo.log_context().fatal(
                    LogReason::Redownload,
                    GitError::StashedChanges { path }.into(),
                ));
            }
        }

        trace!(path = %dir.display(), "deleting directory");
        remove_dir_all(dir, runner.is_dry())
    }

    /// Whether `branch` exists on the remote at `url`. Needs no local clone.
    ///
    /// # Errors
    ///
    /// Returns an error if git cannot be spawned.
    pub fn remote_branch_exists(
        url: &str,
        branch: &str,
        runner: &dyn ProcessRunner,
    ) -> MobResult<bool> {
        Ok(runner.run(&cmd::remote_branch_exists(url, branch))?.success())
    }
}
