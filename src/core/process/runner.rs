// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! ProcessRunner::run(&ProcessBuilder)
//!        |
//!        +-- DirectRunner       (dry: queries only)
//!        +-- TaskRunner         (same, inside span "task")
//!                 |
//!                 v
//!             execute()
//!     std::process::Command
//!     args, cwd, env overrides, stdio
//!                 |
//!          thread::scope
//!      stdin | stdout | stderr
//!      writer  reader   reader --> log at stream level
//!                 |
//!                 v
//!       validate exit_code
//!       (skip if ALLOW_FAILURE)
//!                 |
//!                 v
//!   ProcessOutput { exit_code, stdout, stderr }
//! ```

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{Level, debug, error, info, info_span, trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::{MobResult, ProcessError};

/// Executes configured processes.
///
/// Git operations never spawn processes themselves; they hand a
/// [`ProcessBuilder`] to a runner. Tests substitute a recording fake.
pub trait ProcessRunner: Send + Sync {
    /// Runs the process to completion.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if spawning fails, or if the process exits
    /// with a non-zero code and `ALLOW_FAILURE` is not set.
    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput>;

    /// Whether state-changing processes and filesystem deletes are skipped.
    fn is_dry(&self) -> bool {
        false
    }
}

/// Runs processes on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRunner {
    dry: bool,
}

impl DirectRunner {
    /// A runner that actually spawns processes.
    #[must_use]
    pub const fn new() -> Self {
        Self { dry: false }
    }

    /// A runner that still runs `QUERY` processes but only logs the others,
    /// reporting exit code 0 for them.
    #[must_use]
    pub const fn dry_run() -> Self {
        Self { dry: true }
    }
}

impl ProcessRunner for DirectRunner {
    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput> {
        if self.dry && !process.is_query() {
            info!(cmd = %process.command_line(), "(dry) exec");
            return Ok(ProcessOutput::default());
        }
        execute(process)
    }

    fn is_dry(&self) -> bool {
        self.dry
    }
}

/// Runs processes inside a tracing span named after the owning task, so that
/// every line a process logs is attributed to that task.
#[derive(Debug, Clone)]
pub struct TaskRunner {
    task: String,
    inner: DirectRunner,
}

impl TaskRunner {
    /// Creates a runner for `task` on top of `inner`.
    pub fn new(task: impl Into<String>, inner: DirectRunner) -> Self {
        Self {
            task: task.into(),
            inner,
        }
    }

    /// Name of the owning task.
    #[must_use]
    pub fn task(&self) -> &str {
        &self.task
    }
}

impl ProcessRunner for TaskRunner {
    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput> {
        let span = info_span!("task", name = %self.task);
        let _entered = span.enter();
        self.inner.run(process)
    }

    fn is_dry(&self) -> bool {
        self.inner.is_dry()
    }
}

/// Logs one output line at a runtime-selected level.
fn log_line(level: Level, process: &str, stream: &'static str, line: &str) {
    if level == Level::ERROR {
        error!(process, stream, "{line}");
    } else if level == Level::WARN {
        warn!(process, stream, "{line}");
    } else if level == Level::INFO {
        info!(process, stream, "{line}");
    } else if level == Level::DEBUG {
        debug!(process, stream, "{line}");
    } else {
        trace!(process, stream, "{line}");
    }
}

/// Reads a pipe line by line, forwarding to the log and/or keeping the text.
fn read_stream<R, F>(reader: R, flags: StreamFlags, keep: bool, log: F) -> String
where
    R: Read,
    F: Fn(&str),
{
    let mut reader = BufReader::new(reader);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if flags.contains(StreamFlags::FORWARD_TO_LOG) && !line.is_empty() {
                    log(line);
                }
                if keep {
                    output.push_str(line);
                    output.push('\n');
                }
            }
            Err(e) => {
                warn!(error = %e, "error reading process stream");
                break;
            }
        }
    }

    output
}

fn stdio_from_flags(flags: StreamFlags) -> Stdio {
    if flags.contains(StreamFlags::BIT_BUCKET) {
        Stdio::null()
    } else {
        Stdio::piped()
    }
}

/// Spawns the process and blocks until it exits.
///
/// Stdout is kept only with `KEEP_IN_STRING`; stderr is always kept so it can
/// be reported when the process fails.
fn execute(process: &ProcessBuilder) -> MobResult<ProcessOutput> {
    let name = process.display_name();
    let cmd_line = process.command_line();

    if let Some(cwd) = process.working_dir() {
        debug!(cwd = %cwd.display(), "cd");
    }
    debug!(cmd = %cmd_line, "exec");

    let stdout_config = process.stdout_config();
    let stderr_config = process.stderr_config();

    let mut command = Command::new(process.program());
    command
        .args(process.arguments())
        .envs(process.env_vars())
        .stdin(if process.stdin_content().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(stdio_from_flags(stdout_config.flags()))
        .stderr(stdio_from_flags(stderr_config.flags()));
    if let Some(cwd) = process.working_dir() {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
        command: cmd_line.clone(),
        source,
    })?;
    trace!(process = %name, pid = child.id(), "spawned");

    let stdin_pipe = child.stdin.take();
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let (stdout, stderr, stdin_result) = thread::scope(|s| {
        let stdin_handle = stdin_pipe.map(|mut pipe| {
            let content = process.stdin_content().unwrap_or_default();
            // dropping the pipe at the end closes the child's stdin
            s.spawn(move || pipe.write_all(content.as_bytes()))
        });

        let stdout_handle = stdout_pipe.map(|pipe| {
            let name = name.as_str();
            s.spawn(move || {
                read_stream(
                    pipe,
                    stdout_config.flags(),
                    stdout_config.flags().contains(StreamFlags::KEEP_IN_STRING),
                    |line| log_line(stdout_config.level(), name, "stdout", line),
                )
            })
        });

        let stderr_handle = stderr_pipe.map(|pipe| {
            let name = name.as_str();
            s.spawn(move || {
                read_stream(pipe, stderr_config.flags(), true, |line| {
                    log_line(process.stderr_line_level(line), name, "stderr", line);
                })
            })
        });

        let join = |h: thread::ScopedJoinHandle<'_, String>| {
            h.join().unwrap_or_else(|e| std::panic::resume_unwind(e))
        };
        let stdout = stdout_handle.map(join).unwrap_or_default();
        let stderr = stderr_handle.map(join).unwrap_or_default();
        let stdin_result = stdin_handle
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .transpose();

        (stdout, stderr, stdin_result)
    });

    let status = child.wait().map_err(|source| ProcessError::Io {
        command: cmd_line.clone(),
        source,
    })?;

    if let Err(source) = stdin_result {
        return Err(ProcessError::StdinFailed {
            command: cmd_line,
            source,
        }
        .into());
    }

    let output = ProcessOutput::new(status.code().unwrap_or(-1), stdout, stderr);

    if !process.allows_failure() && !output.success() {
        for line in output.stderr().lines().filter(|l| !l.is_empty()) {
            error!(process = %name, "{line}");
        }
        return Err(ProcessError::NonZeroExit {
            command: cmd_line,
            code: output.exit_code(),
        }
        .into());
    }

    trace!(process = %name, exit_code = output.exit_code(), "completed");
    Ok(output)
}
