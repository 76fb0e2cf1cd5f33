// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [global]        dry, ignore_uncommitted, log levels, log file
//! [git]           binary, url_pattern, clone/pull policy, credentials, fork
//! [paths]         build
//! [repos.<name>]  url, branch, path, submodule_of, shallow
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::git::repo::RemoteSetup;
use crate::git::url::UrlPattern;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log commands instead of running anything that changes state.
    pub dry: bool,
    /// Allow deleting repositories with uncommitted or stashed changes.
    pub ignore_uncommitted: bool,
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            ignore_uncommitted: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("mob-sync.log"),
        }
    }
}

/// Git behaviour shared by every repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable, looked up in `PATH` when not absolute.
    pub binary: PathBuf,
    /// Pattern for fork urls, with `{org}` and `{file}` placeholders.
    pub url_pattern: UrlPattern,
    /// Clone with `--depth 1`.
    pub shallow: bool,
    /// Mark tracked `.ts` files assume-unchanged after cloning.
    pub ignore_ts: bool,
    /// Revert tracked `.ts` files before pulling.
    pub revert_ts: bool,
    /// `user.name` set after cloning.
    pub username: String,
    /// `user.email` set after cloning.
    pub email: String,
    /// Organization owning the forks; empty leaves origin alone.
    pub remote_org: String,
    /// `PuTTY` key stored on the fork remote.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_key: Option<PathBuf>,
    pub remote_no_push_upstream: bool,
    pub remote_push_default_origin: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
            url_pattern: UrlPattern::default(),
            shallow: true,
            ignore_ts: true,
            revert_ts: false,
            username: String::new(),
            email: String::new(),
            remote_org: String::new(),
            remote_key: None,
            remote_no_push_upstream: false,
            remote_push_default_origin: false,
        }
    }
}

impl GitConfig {
    /// Fork rewiring applied after a clone.
    #[must_use]
    pub fn remote_setup(&self) -> RemoteSetup {
        RemoteSetup::builder()
            .org(self.remote_org.as_str())
            .maybe_key(self.remote_key.clone())
            .no_push_upstream(self.remote_no_push_upstream)
            .push_default_origin(self.remote_push_default_origin)
            .url_pattern(self.url_pattern.clone())
            .build()
    }
}

/// Directory layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding every working tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<PathBuf>,
}

fn default_branch() -> String {
    "master".to_string()
}

/// One `[repos.<name>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    pub url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Working tree relative to `paths.build`, defaults to the repo name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Parent repository, relative to `paths.build`, this one is attached to
    /// as a submodule after syncing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submodule_of: Option<PathBuf>,
    /// Overrides `git.shallow`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shallow: Option<bool>,
}
