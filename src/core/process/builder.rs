// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder with configuration options.
//!
//! ```text
//! ProcessBuilder
//!  • new/exists/find
//!  • arg/args/cwd/env/flag/name/stdin
//!  • stdout_*/stderr_* (flags + log level), stderr_filter
//!
//! ProcessFlags: ALLOW_FAILURE, QUERY
//! StreamFlags:  FORWARD_TO_LOG (default), BIT_BUCKET, KEEP_IN_STRING
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use tracing::Level;

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

/// Get the executable cache, initializing if needed.
fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    /// Flags controlling process execution behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// A non-zero exit is returned in `ProcessOutput` instead of failing
        const ALLOW_FAILURE = 0x01;
        /// Only inspects state, so it still runs in dry mode
        const QUERY = 0x02;
    }
}

bitflags! {
    /// Flags controlling stream handling for stdout/stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Forward output to tracing logs
        const FORWARD_TO_LOG = 0x01;
        /// Discard output (send to /dev/null)
        const BIT_BUCKET = 0x02;
        /// Keep output in a string for later retrieval
        const KEEP_IN_STRING = 0x04;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG
    }
}

/// Rewrites the level of a single stderr line before it is logged.
///
/// Receives the line and the level configured for the stream.
pub type LineFilter = fn(&str, Level) -> Level;

/// Output from a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    /// Creates a new `ProcessOutput`.
    #[must_use]
    pub const fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Output of a process that exited with `exit_code` and printed nothing.
    #[must_use]
    pub const fn with_exit_code(exit_code: i32) -> Self {
        Self::new(exit_code, String::new(), String::new())
    }

    /// Returns the process exit code (0 = success).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns captured stdout (if `KEEP_IN_STRING` was set).
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns stderr, unless the stream was sent to the bit bucket.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns true if the process exited successfully (code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Configuration for a stream (stdout or stderr).
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    flags: StreamFlags,
    level: Level,
}

impl StreamConfig {
    /// Returns the stream flags.
    #[must_use]
    pub const fn flags(&self) -> StreamFlags {
        self.flags
    }

    /// Returns the level forwarded lines are logged at.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            flags: StreamFlags::FORWARD_TO_LOG,
            level: Level::TRACE,
        }
    }
}

/// Builder for configuring a process.
///
/// Nothing happens until the builder is handed to a
/// [`ProcessRunner`](super::runner::ProcessRunner).
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    /// Path to the executable
    program: PathBuf,
    /// Command-line arguments
    args: Vec<String>,
    /// Working directory
    cwd: Option<PathBuf>,
    /// Environment overrides on top of the inherited environment
    env: BTreeMap<String, String>,
    flags: ProcessFlags,
    stdout: StreamConfig,
    stderr: StreamConfig,
    stderr_filter: Option<LineFilter>,
    /// Stdin content (if any)
    stdin: Option<String>,
    /// Display name for logging
    name: Option<String>,
}

impl ProcessBuilder {
    /// Creates a new `ProcessBuilder` for the given program.
    ///
    /// The program can be an absolute path, relative path, or just the executable name.
    /// A bare name is resolved through PATH by the operating system at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamConfig::default(),
            stderr: StreamConfig::default(),
            stderr_filter: None,
            stdin: None,
            name: None,
        }
    }

    /// Checks if an executable exists in PATH.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        Self::find(program).is_some()
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Results are cached for subsequent lookups.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        let path = which::which(program).ok()?;
        exe_cache()
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Some(path)
    }

    /// Adds an argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Adds multiple arguments to the command.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets one environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Adds a process flag.
    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Configures stdout handling.
    #[must_use]
    pub const fn stdout_flags(mut self, flags: StreamFlags) -> Self {
        self.stdout.flags = flags;
        self
    }

    /// Sets the level stdout lines are logged at.
    #[must_use]
    pub const fn stdout_level(mut self, level: Level) -> Self {
        self.stdout.level = level;
        self
    }

    /// Configures stderr handling.
    #[must_use]
    pub const fn stderr_flags(mut self, flags: StreamFlags) -> Self {
        self.stderr.flags = flags;
        self
    }

    /// Sets the level stderr lines are logged at.
    #[must_use]
    pub const fn stderr_level(mut self, level: Level) -> Self {
        self.stderr.level = level;
        self
    }

    /// Installs a filter that can change the level of individual stderr lines.
    #[must_use]
    pub const fn stderr_filter(mut self, filter: LineFilter) -> Self {
        self.stderr_filter = Some(filter);
        self
    }

    /// Convenience: capture stdout to string, without logging it.
    #[must_use]
    pub const fn capture_stdout(self) -> Self {
        self.stdout_flags(StreamFlags::KEEP_IN_STRING)
    }

    /// Sets stdin content.
    #[must_use]
    pub fn stdin(mut self, content: impl Into<String>) -> Self {
        self.stdin = Some(content.into());
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Returns the working directory, if set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Returns the environment overrides.
    #[must_use]
    pub const fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the process flags.
    #[must_use]
    pub const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    /// Whether a non-zero exit is tolerated.
    #[must_use]
    pub const fn allows_failure(&self) -> bool {
        self.flags.contains(ProcessFlags::ALLOW_FAILURE)
    }

    /// Whether the process only inspects state.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        self.flags.contains(ProcessFlags::QUERY)
    }

    /// Returns the stdout configuration.
    #[must_use]
    pub const fn stdout_config(&self) -> StreamConfig {
        self.stdout
    }

    /// Returns the stderr configuration.
    #[must_use]
    pub const fn stderr_config(&self) -> StreamConfig {
        self.stderr
    }

    /// Level a given stderr line is logged at, after the filter.
    #[must_use]
    pub fn stderr_line_level(&self, line: &str) -> Level {
        self.stderr_filter
            .map_or(self.stderr.level, |filter| filter(line, self.stderr.level))
    }

    /// Returns the stdin content, if set.
    #[must_use]
    pub fn stdin_content(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// Returns the display name for this process.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.program.file_stem().map_or_else(
                || "process".to_string(),
                |s| s.to_string_lossy().into_owned(),
            )
        })
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = self.program.display().to_string();
        for arg in &self.args {
            if arg.is_empty() || arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }
}
