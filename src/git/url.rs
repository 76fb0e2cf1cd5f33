// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote URL construction and parsing.
//!
//! ```text
//! UrlPattern "git@github.com:{org}/{file}"
//!     .url("forker", "repo.git") --> git@github.com:forker/repo.git
//!
//! parse_git_file("git@host:acme/repo.git\n") --> "repo.git"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GitError;

/// Pattern used to build remote URLs from an organization and a repository
/// file name. `{org}` and `{file}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlPattern(String);

impl UrlPattern {
    /// SSH-style GitHub pattern.
    pub const DEFAULT: &'static str = "git@github.com:{org}/{file}";

    /// Creates a pattern from a string containing `{org}` and `{file}`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// Builds the URL for `org` and `git_file`.
    #[must_use]
    pub fn url(&self, org: &str, git_file: &str) -> String {
        self.0.replace("{org}", org).replace("{file}", git_file)
    }

    /// Returns the raw pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrlPattern {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the repository file name (last path segment) from the output of
/// `git remote get-url`.
///
/// # Errors
///
/// Returns `GitError::BadRemoteUrl` if the output has no `/` or nothing
/// after the last one.
pub fn parse_git_file(output: &str) -> Result<String, GitError> {
    let bad = || GitError::BadRemoteUrl {
        output: output.to_string(),
    };

    let (_, file) = output.rsplit_once('/').ok_or_else(bad)?;
    let file = file.trim();
    if file.is_empty() {
        return Err(bad());
    }

    Ok(file.to_string())
}
