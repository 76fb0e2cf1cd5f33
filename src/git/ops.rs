// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations over many repositories.
//!
//! ```text
//! set_remotes_for_all  credentials + origin/upstream rewiring per repo
//! add_remote_to_repos  add a named fork remote per repo
//! set_ignore_ts        mark/unmark tracked .ts files assume-unchanged
//! revert_ts_for_all    discard changes to tracked .ts files
//! list_branches        report current branch per repo
//! sync_repos           clone-or-pull configured repos, queue submodules
//! ```

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span};

use super::repo::{GitRepo, RemoteSetup};
use super::submodule::{SubmoduleQueue, SubmoduleRequest};
use super::sync::{SyncOperation, SyncOutcome};
use super::url::UrlPattern;
use crate::config::Config;
use crate::config::types::RepoConfig;
use crate::core::process::ProcessRunner;
use crate::error::Result;
use crate::logging::{LogContext, LogReason};

fn repo_name(repo: &Path) -> &str {
    repo.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
}

/// Sets credentials and rewires origin to the fork in every repository.
///
/// Repositories that already have an `upstream` remote keep their remotes.
///
/// # Errors
///
/// Returns an error on the first repository where git fails.
pub fn set_remotes_for_all(
    repos: &[PathBuf],
    runner: &dyn ProcessRunner,
    username: &str,
    email: &str,
    setup: &RemoteSetup,
) -> Result<()> {
    for repo in repos {
        let name = repo_name(repo);
        info!(repo = %name, "setting remotes");

        let git = GitRepo::new(repo, runner);
        git.set_credentials(username, email)
            .with_context(|| format!("failed to set credentials in {name}"))?;
        git.set_origin_and_upstream_remotes(setup)
            .with_context(|| format!("failed to set remotes in {name}"))?;
    }

    Ok(())
}

/// Adds remote `name` pointing at `org`'s fork in every repository.
///
/// # Errors
///
/// Returns an error on the first repository where git fails.
pub fn add_remote_to_repos(
    repos: &[PathBuf],
    runner: &dyn ProcessRunner,
    name: &str,
    org: &str,
    key: Option<&Path>,
    push_default: bool,
    url_pattern: &UrlPattern,
) -> Result<()> {
    for repo in repos {
        let repo_name = repo_name(repo);
        info!(repo = %repo_name, remote = name, "adding remote");

        GitRepo::new(repo, runner)
            .add_remote(name, org, key, push_default, url_pattern, None)
            .with_context(|| format!("failed to add remote {name} for {repo_name}"))?;
    }

    Ok(())
}

/// Sets or clears assume-unchanged on tracked `.ts` files in every repository.
///
/// Returns the total number of files changed.
///
/// # Errors
///
/// Returns an error on the first repository where git fails.
pub fn set_ignore_ts(repos: &[PathBuf], runner: &dyn ProcessRunner, on: bool) -> Result<usize> {
    let mut total = 0;

    for repo in repos {
        let name = repo_name(repo);
        let count = GitRepo::new(repo, runner)
            .ignore_ts(on)
            .with_context(|| format!("failed to toggle .ts files in {name}"))?;

        if count > 0 {
            info!(
                repo = %name,
                count,
                "{} .ts files",
                if on { "ignored" } else { "unignored" }
            );
        }
        total += count;
    }

    Ok(total)
}

/// Reverts tracked `.ts` files in every repository.
///
/// # Errors
///
/// Returns an error on the first repository where git fails.
pub fn revert_ts_for_all(repos: &[PathBuf], runner: &dyn ProcessRunner) -> Result<usize> {
    let mut total = 0;

    for repo in repos {
        let name = repo_name(repo);
        let count = GitRepo::new(repo, runner)
            .revert_ts()
            .with_context(|| format!("failed to revert .ts files in {name}"))?;

        if count > 0 {
            info!(repo = %name, count, "reverted .ts files");
        }
        total += count;
    }

    Ok(total)
}

/// Current branch of every repository, `(detached)` for a detached HEAD.
///
/// # Errors
///
/// Returns an error if querying a branch fails.
pub fn list_branches(
    repos: &[PathBuf],
    runner: &dyn ProcessRunner,
) -> Result<Vec<(PathBuf, String)>> {
    let mut branches = Vec::with_capacity(repos.len());

    for repo in repos {
        let branch = GitRepo::new(repo, runner)
            .current_branch()
            .with_context(|| format!("failed to get current branch for {}", repo_name(repo)))?;

        let branch = if branch.is_empty() {
            "(detached)".to_string()
        } else {
            branch
        };
        branches.push((repo.clone(), branch));
    }

    Ok(branches)
}

/// Builds the sync operation for one configured repository.
///
/// # Errors
///
/// Returns an error if `paths.build` is not configured.
pub fn sync_operation(config: &Config, name: &str, repo: &RepoConfig) -> Result<SyncOperation> {
    let git = &config.git;

    Ok(SyncOperation::builder()
        .url(repo.url.as_str())
        .branch(repo.branch.as_str())
        .root(config.repo_root(name, repo)?)
        .shallow(config.shallow(repo))
        .username(git.username.as_str())
        .email(git.email.as_str())
        .ignore_ts_on_clone(git.ignore_ts)
        .revert_ts_on_pull(git.revert_ts)
        .remotes(git.remote_setup())
        .build())
}

/// Clones or pulls the named repositories, all of them when `names` is empty.
///
/// Parents are synced before the repositories that name them in
/// `submodule_of`. Freshly cloned submodules are attached to their parent
/// through a [`SubmoduleQueue`] running on `submodule_runner`, which is
/// drained before returning.
///
/// # Errors
///
/// Returns an error for an unknown repository name, a `submodule_of` cycle
/// or the first failed sync.
pub fn sync_repos(
    config: &Config,
    runner: &dyn ProcessRunner,
    submodule_runner: Arc<dyn ProcessRunner>,
    names: &[String],
) -> Result<Vec<(String, SyncOutcome)>> {
    let selected = parents_first(config, select_repos(config, names)?)?;
    let queue = SubmoduleQueue::start(submodule_runner)?;
    let mut outcomes = Vec::with_capacity(selected.len());

    for (name, repo) in selected {
        let _span = info_span!("sync", repo = %name).entered();

        let operation = sync_operation(config, name, repo)?;
        let root = operation.root().to_path_buf();
        let outcome = operation
            .run(runner)
            .with_context(|| format!("failed to sync {name}"))?;
        info!(repo = %name, ?outcome, "synced");

        if outcome == SyncOutcome::Cloned
            && let Some(parent) = &repo.submodule_of
        {
            let parent_root = config.build_dir()?.join(parent);
            let request = SubmoduleRequest::builder()
                .url(repo.url.as_str())
                .branch(repo.branch.as_str())
                .name(submodule_path(&root, &parent_root)?)
                .root(parent_root)
                .build();
            debug!(repo = %name, parent = %request.root().display(), "queueing submodule");
            queue.enqueue(request);
        }

        outcomes.push((name.to_string(), outcome));
    }

    queue.finish();
    Ok(outcomes)
}

fn select_repos<'c>(
    config: &'c Config,
    names: &[String],
) -> Result<Vec<(&'c str, &'c RepoConfig)>> {
    if names.is_empty() {
        return Ok(config
            .repos
            .iter()
            .map(|(name, repo)| (name.as_str(), repo))
            .collect());
    }

    names
        .iter()
        .map(|name| {
            config
                .repos
                .get_key_value(name.as_str())
                .map(|(name, repo)| (name.as_str(), repo))
                .ok_or_else(|| {
                    anyhow::Error::from(
                        LogContext::default()
                            .bail_out(LogReason::Config, format!("unknown repo '{name}'")),
                    )
                })
        })
        .collect()
}

/// Stable reorder of `selected` so that a repository comes after the
/// selected repository its `submodule_of` points at.
fn parents_first<'c>(
    config: &Config,
    selected: Vec<(&'c str, &'c RepoConfig)>,
) -> Result<Vec<(&'c str, &'c RepoConfig)>> {
    if selected.iter().all(|(_, repo)| repo.submodule_of.is_none()) {
        return Ok(selected);
    }

    let build = config.build_dir()?;
    let mut pending = selected
        .into_iter()
        .map(|(name, repo)| -> Result<_> { Ok((config.repo_root(name, repo)?, name, repo)) })
        .collect::<Result<Vec<_>>>()?;
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let waiting: Vec<bool> = pending
            .iter()
            .map(|(_, _, repo)| {
                repo.submodule_of.as_ref().is_some_and(|parent| {
                    let parent_root = build.join(parent);
                    pending.iter().any(|(root, _, _)| *root == parent_root)
                })
            })
            .collect();

        if waiting.iter().all(|w| *w) {
            let names: Vec<&str> = pending.iter().map(|(_, name, _)| *name).collect();
            return Err(anyhow::Error::from(LogContext::default().bail_out(
                LogReason::Config,
                format!("submodule_of cycle between {}", names.join(", ")),
            )));
        }

        let mut held = Vec::new();
        for (entry, wait) in pending.into_iter().zip(waiting) {
            if wait {
                held.push(entry);
            } else {
                ordered.push((entry.1, entry.2));
            }
        }
        pending = held;
    }

    Ok(ordered)
}

/// `root` relative to `parent_root`, with forward slashes as git expects.
fn submodule_path(root: &Path, parent_root: &Path) -> Result<String> {
    let relative = root.strip_prefix(parent_root).with_context(|| {
        format!(
            "{} is not inside {}",
            root.display(),
            parent_root.display()
        )
    })?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
