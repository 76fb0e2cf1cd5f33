// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command construction.
//!
//! ```text
//! cmd::clone(root, url, branch, shallow)
//!     --> ProcessBuilder "git clone ..."
//!         env GCM_INTERACTIVE=never, GIT_TERMINAL_PROMPT=0
//!         cwd root (except clone, ls-remote)
//!         per-command stream levels / ALLOW_FAILURE
//!         QUERY on read-only commands (still run in dry mode)
//! ```
//!
//! Nothing here runs a process. Every function returns a configured
//! [`ProcessBuilder`]; execution goes through a `ProcessRunner`.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::Level;

use crate::core::process::{ProcessBuilder, ProcessFlags, StreamFlags};

/// Git binary configured at startup.
static GIT_BINARY: OnceLock<PathBuf> = OnceLock::new();

/// Sets the git binary used by every command. Only the first call wins.
///
/// Returns `false` if a binary had already been set.
pub fn set_binary(path: impl Into<PathBuf>) -> bool {
    GIT_BINARY.set(path.into()).is_ok()
}

/// The git binary, `git` unless configured otherwise.
#[must_use]
pub fn binary() -> &'static Path {
    GIT_BINARY.get().map_or(Path::new("git"), PathBuf::as_path)
}

/// Git path strings always use forward slashes.
fn slashed(file: &Path) -> String {
    file.to_string_lossy().replace('\\', "/")
}

/// Base git invocation with prompts disabled.
fn git() -> ProcessBuilder {
    ProcessBuilder::new(binary())
        .name("git")
        .env("GCM_INTERACTIVE", "never")
        .env("GIT_TERMINAL_PROMPT", "0")
}

/// Base git invocation running inside `root`.
fn git_in(root: &Path) -> ProcessBuilder {
    git().cwd(root)
}

/// Read-only git invocation running inside `root`.
fn query_in(root: &Path) -> ProcessBuilder {
    git_in(root).flag(ProcessFlags::QUERY)
}

/// Demotes git's complaint about a directory not being a repository, which is
/// the expected answer of a repository check.
fn demote_not_a_repo(line: &str, level: Level) -> Level {
    if line.contains("not a git repo") {
        Level::TRACE
    } else {
        level
    }
}

/// `git clone` of `url` at `branch` into `root`.
#[must_use]
pub fn clone(root: &Path, url: &str, branch: &str, shallow: bool) -> ProcessBuilder {
    let mut process = git()
        .stderr_level(Level::TRACE)
        .arg("clone")
        .arg("--recurse-submodules");
    if shallow {
        process = process.args(["--depth", "1"]);
    }
    process
        .args(["--branch", branch])
        .arg("--quiet")
        .args(["-c", "advice.detachedHead=false"])
        .arg(url)
        .arg(root)
}

/// `git pull` of `branch` from `url`.
#[must_use]
pub fn pull(root: &Path, url: &str, branch: &str) -> ProcessBuilder {
    git_in(root)
        .stderr_level(Level::TRACE)
        .args(["pull", "--recurse-submodules", "--quiet", url, branch])
}

/// Tolerant check for a remote; exit code 0 means it exists.
#[must_use]
pub fn has_remote(root: &Path, name: &str) -> ProcessBuilder {
    query_in(root)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stderr_level(Level::DEBUG)
        .arg("config")
        .arg(format!("remote.{name}.url"))
}

/// `git remote rename`.
#[must_use]
pub fn rename_remote(root: &Path, from: &str, to: &str) -> ProcessBuilder {
    git_in(root).args(["remote", "rename", from, to])
}

/// `git remote add`.
#[must_use]
pub fn add_remote(root: &Path, name: &str, url: &str) -> ProcessBuilder {
    git_in(root).args(["remote", "add", name, url])
}

/// Sets the push url of `remote`.
#[must_use]
pub fn set_remote_push(root: &Path, remote: &str, url: &str) -> ProcessBuilder {
    git_in(root).args(["remote", "set-url", "--push", remote, url])
}

/// `git config <key> <value>`.
#[must_use]
pub fn set_config(root: &Path, key: &str, value: &str) -> ProcessBuilder {
    git_in(root)
        .stderr_level(Level::TRACE)
        .args(["config", key, value])
}

/// Tolerant check whether `file` is in the index; exit code 0 means tracked.
#[must_use]
pub fn is_tracked(root: &Path, file: &Path) -> ProcessBuilder {
    query_in(root)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_level(Level::DEBUG)
        .stderr_level(Level::DEBUG)
        .args(["ls-files", "--error-unmatch"])
        .arg(slashed(file))
}

/// Toggles the assume-unchanged index flag of `file`.
#[must_use]
pub fn set_assume_unchanged(root: &Path, file: &Path, on: bool) -> ProcessBuilder {
    git_in(root)
        .arg("update-index")
        .arg(if on {
            "--assume-unchanged"
        } else {
            "--no-assume-unchanged"
        })
        .arg(slashed(file))
}

/// Current branch on stdout; the caller trims it.
#[must_use]
pub fn current_branch(root: &Path) -> ProcessBuilder {
    query_in(root)
        .capture_stdout()
        .args(["branch", "--show-current"])
}

/// Porcelain status; dirty iff stdout is non-empty.
#[must_use]
pub fn has_uncommitted_changes(root: &Path) -> ProcessBuilder {
    query_in(root)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .capture_stdout()
        .args(["status", "-s", "--porcelain"])
}

/// `git stash show`; exit code 0 means a stash exists.
#[must_use]
pub fn has_stashed_changes(root: &Path) -> ProcessBuilder {
    query_in(root)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_flags(StreamFlags::BIT_BUCKET)
        .stderr_level(Level::TRACE)
        .args(["stash", "show"])
}

/// `git ls-remote` for a single head; exit code 0 means the branch exists.
/// Runs outside any repository.
#[must_use]
pub fn remote_branch_exists(url: &str, branch: &str) -> ProcessBuilder {
    git()
        .flag(ProcessFlags::QUERY)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_level(Level::TRACE)
        .stderr_level(Level::DEBUG)
        .args(["ls-remote", "--exit-code", "--heads", url, branch])
}

/// Tolerant check whether `root` is inside a work tree.
#[must_use]
pub fn is_repo(root: &Path) -> ProcessBuilder {
    query_in(root)
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_level(Level::TRACE)
        .stderr_level(Level::DEBUG)
        .stderr_filter(demote_not_a_repo)
        .args(["rev-parse", "--is-inside-work-tree"])
}

/// Url of `origin` on stdout.
#[must_use]
pub fn remote_url(root: &Path) -> ProcessBuilder {
    query_in(root)
        .capture_stdout()
        .args(["remote", "get-url", "origin"])
}

/// Applies `diff` read from stdin.
#[must_use]
pub fn apply(root: &Path, diff: &str) -> ProcessBuilder {
    git_in(root)
        .args(["apply", "--whitespace", "nowarn", "-"])
        .stdin(diff)
}

/// `git fetch` of `branch` from `remote`.
#[must_use]
pub fn fetch(root: &Path, remote: &str, branch: &str) -> ProcessBuilder {
    git_in(root).args(["fetch", "-q", remote, branch])
}

/// Quiet checkout of a branch, tag or commit.
#[must_use]
pub fn checkout(root: &Path, what: &str) -> ProcessBuilder {
    git_in(root).args(["-c", "advice.detachedHead=false", "checkout", "-q", what])
}

/// Discards local modifications to `file`.
#[must_use]
pub fn revert(root: &Path, file: &Path) -> ProcessBuilder {
    git_in(root)
        .stderr_level(Level::TRACE)
        .arg("checkout")
        .arg(slashed(file))
}

/// Adds `url` as submodule `name` at `branch`, checked out into `<root>/<name>`.
#[must_use]
pub fn add_submodule(root: &Path, branch: &str, name: &str, url: &str) -> ProcessBuilder {
    git_in(root).stderr_level(Level::TRACE).args([
        "-c",
        "core.autocrlf=false",
        "submodule",
        "--quiet",
        "add",
        "-b",
        branch,
        "--force",
        "--name",
        name,
        url,
        name,
    ])
}

/// `git init` in `root`.
#[must_use]
pub fn init(root: &Path) -> ProcessBuilder {
    git_in(root).arg("init")
}
