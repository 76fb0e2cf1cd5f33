// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for mob-sync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. mob-sync.toml (cwd)
//! 3. --ini FILE (repeatable)
//! 4. MOBSYNC_* env vars
//! 5. --set section/key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! MOBSYNC_GLOBAL__DRY=true        → global.dry = true
//! MOBSYNC_PATHS__BUILD=/path      → paths.build = "/path"
//! MOBSYNC_GIT__REMOTE_ORG=MyOrg   → git.remote_org = "MyOrg"
//! ```
//!
//! # Repositories
//!
//! ```toml
//! [paths]
//! build = "/mo2/build"
//!
//! [repos.usvfs]
//! url = "https://github.com/ModOrganizer2/usvfs.git"
//!
//! [repos.uibase]
//! url = "https://github.com/ModOrganizer2/modorganizer-uibase.git"
//! path = "modorganizer_super/uibase"
//! submodule_of = "modorganizer_super"
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig, PathsConfig, RepoConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git behaviour.
    pub git: GitConfig,
    /// Directory layout.
    pub paths: PathsConfig,
    /// Repositories to sync, by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub repos: BTreeMap<String, RepoConfig>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mob_sync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("mob-sync.toml")
    ///     .with_env_prefix("MOBSYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` for a repository without a url and
    /// `ConfigError::InvalidValue` for a url pattern without `{file}` or a
    /// submodule whose working tree is not inside its parent.
    pub fn validate(&self) -> Result<()> {
        if !self.git.url_pattern.as_str().contains("{file}") {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "url_pattern".to_string(),
                message: format!("'{}' has no {{file}} placeholder", self.git.url_pattern),
            }
            .into());
        }

        for (name, repo) in &self.repos {
            if repo.url.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: format!("repos.{name}"),
                    key: "url".to_string(),
                }
                .into());
            }

            if let Some(parent) = &repo.submodule_of {
                let build = self.paths.build.as_deref().unwrap_or_else(|| Path::new(""));
                let root = build.join(repo.path.as_deref().unwrap_or_else(|| Path::new(name)));
                let parent_root = build.join(parent);
                let nested = root
                    .strip_prefix(&parent_root)
                    .is_ok_and(|rest| rest.components().next().is_some());
                if !nested {
                    return Err(ConfigError::InvalidValue {
                        section: format!("repos.{name}"),
                        key: "submodule_of".to_string(),
                        message: format!(
                            "'{}' is not inside '{}'",
                            root.display(),
                            parent_root.display()
                        ),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }

    /// The `paths.build` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `paths.build` is not set.
    pub fn build_dir(&self) -> Result<&Path> {
        self.paths
            .build
            .as_deref()
            .context("paths.build not configured")
    }

    /// Working tree of repository `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `paths.build` is not set.
    pub fn repo_root(&self, name: &str, repo: &RepoConfig) -> Result<PathBuf> {
        let relative = repo.path.as_deref().unwrap_or_else(|| Path::new(name));
        Ok(self.build_dir()?.join(relative))
    }

    /// Whether `repo` is cloned with `--depth 1`.
    #[must_use]
    pub fn shallow(&self, repo: &RepoConfig) -> bool {
        repo.shallow.unwrap_or(self.git.shallow)
    }

    /// Format configuration options for display.
    ///
    /// Returns one `key = value` line per option, sorted by key. The key of
    /// the fork remote is shown as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_repo_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.ignore_uncommitted".into(),
            self.global.ignore_uncommitted.to_string(),
        );
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        let git = &self.git;
        options.insert("git.binary".into(), git.binary.display().to_string());
        options.insert("git.url_pattern".into(), git.url_pattern.to_string());
        options.insert("git.shallow".into(), git.shallow.to_string());
        options.insert("git.ignore_ts".into(), git.ignore_ts.to_string());
        options.insert("git.revert_ts".into(), git.revert_ts.to_string());
        options.insert("git.username".into(), git.username.clone());
        options.insert("git.email".into(), git.email.clone());
        options.insert("git.remote_org".into(), git.remote_org.clone());
        if git.remote_key.is_some() {
            options.insert("git.remote_key".into(), "[hidden]".into());
        }
        options.insert(
            "git.remote_no_push_upstream".into(),
            git.remote_no_push_upstream.to_string(),
        );
        options.insert(
            "git.remote_push_default_origin".into(),
            git.remote_push_default_origin.to_string(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "paths.build".into(),
            self.paths
                .build
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_repo_options(&self, options: &mut BTreeMap<String, String>) {
        for (name, repo) in &self.repos {
            options.insert(format!("repos.{name}.url"), repo.url.clone());
            options.insert(format!("repos.{name}.branch"), repo.branch.clone());
            if let Some(path) = &repo.path {
                options.insert(format!("repos.{name}.path"), path.display().to_string());
            }
            if let Some(parent) = &repo.submodule_of {
                options.insert(
                    format!("repos.{name}.submodule_of"),
                    parent.display().to_string(),
                );
            }
            if let Some(shallow) = repo.shallow {
                options.insert(format!("repos.{name}.shallow"), shallow.to_string());
            }
        }
    }
}
