// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git repository discovery.
//!
//! ```text
//! paths.build/
//!   usvfs/                 [repos.usvfs]        included if a git repo
//!   modorganizer_super/
//!     uibase/              [repos.uibase]       included if a git repo
//!   stray/                 (not configured)     ignored
//! ```
//!
//! With no `[repos]` configured every non-hidden directory of `paths.build`
//! that is a git repository is used instead. Returns a sorted list of repo
//! paths for deterministic ordering.

use anyhow::Context;
use std::path::{Path, PathBuf};

use super::repo::GitRepo;
use crate::config::Config;
use crate::core::process::ProcessRunner;
use crate::error::Result;

/// Discover the git repositories under `paths.build`.
///
/// # Errors
///
/// Returns an error if `paths.build` is not configured or cannot be read.
pub fn get_repos(config: &Config, runner: &dyn ProcessRunner) -> Result<Vec<PathBuf>> {
    let candidates = if config.repos.is_empty() {
        scan_build_dir(config.build_dir()?)?
    } else {
        config
            .repos
            .iter()
            .map(|(name, repo)| config.repo_root(name, repo))
            .collect::<Result<Vec<_>>>()?
    };

    let mut repos = Vec::new();
    for path in candidates {
        if GitRepo::new(&path, runner).is_git_repo()? {
            repos.push(path);
        }
    }

    repos.sort();
    repos.dedup();
    Ok(repos)
}

/// A single repository when `path` is given, otherwise [`get_repos`].
///
/// # Errors
///
/// Returns an error if discovery fails.
pub fn target_repos(
    config: &Config,
    runner: &dyn ProcessRunner,
    path: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    match path {
        Some(path) => Ok(vec![path.to_path_buf()]),
        None => get_repos(config, runner),
    }
}

fn scan_build_dir(build: &Path) -> Result<Vec<PathBuf>> {
    if !build.exists() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in
        std::fs::read_dir(build).with_context(|| format!("failed to read {}", build.display()))?
    {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", build.display()))?;
        let path = entry.path();

        if !path.is_dir() {
            continue;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.starts_with('.')
        {
            continue;
        }

        dirs.push(path);
    }

    Ok(dirs)
}
