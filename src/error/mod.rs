// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!           MobError (~24 bytes)
//!                  |
//!   +------+-------+-------+------+-----+
//!   |      |       |       |      |     |
//!   v      v       v       v      v     v
//! Bail    Git   Process  Config  Fs  Io/Other
//!         Box     Box     Box    Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     BadRemoteUrl, MissingParameters, UncommittedChanges,
//!           StashedChanges
//!   Process SpawnFailed, NonZeroExit, StdinFailed, Io
//!   Config  MissingKey, InvalidValue
//!   Fs      IoError
//! ```
//!
//! Tolerated process failures never show up here: a process run with
//! `ALLOW_FAILURE` returns its exit code inside `Ok(ProcessOutput)`.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`MobError`].
pub type MobResult<T> = std::result::Result<T, MobError>;

/// Top-level error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum MobError {
    /// Fatal error that aborts the current high-level operation.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl MobError {
    /// Whether this error is a deliberate bail-out rather than an I/O or
    /// process failure.
    #[must_use]
    pub const fn is_bailed(&self) -> bool {
        matches!(self, Self::Bailed(_))
    }
}

/// Create a fatal [`MobError::Bailed`].
///
/// Prefer [`crate::logging::LogContext::bail_out`], which also logs the message.
pub fn bail_out(message: impl Into<String>) -> MobError {
    MobError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for MobError {
                fn from(err: $error) -> Self {
                    MobError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ProcessError => Process,
    ConfigError => Config,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// `git remote get-url` output could not be turned into a repository file name.
    #[error("bad get-url output '{output}'")]
    BadRemoteUrl { output: String },

    /// A sync operation was run without its url or root.
    #[error("git missing parameters ({missing})")]
    MissingParameters { missing: &'static str },

    /// Uncommitted changes detected when a clean working tree is required.
    #[error(
        "will not delete {path}, has uncommitted changes; see --ignore-uncommitted-changes"
    )]
    UncommittedChanges { path: String },

    /// Stashed changes detected when a clean repository is required.
    #[error("will not delete {path}, has stashed changes; see --ignore-uncommitted-changes")]
    StashedChanges { path: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a code outside its success set.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Failed to feed stdin to the process.
    #[error("failed to write stdin of process '{command}': {source}")]
    StdinFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to wait for the process or read its output.
    #[error("failed to read output from process '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
