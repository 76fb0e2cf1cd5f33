// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test-only process runner that records git invocations.
//!
//! ```text
//! RecordingRunner::new()
//!     .respond("config remote.upstream.url", 1, "")
//!     .respond("remote get-url origin", 0, "git@host:acme/repo.git\n")
//!
//! run(process) --> record "args joined by spaces"
//!              --> first rule whose prefix matches, else exit 0 / no output
//!              --> NonZeroExit unless ALLOW_FAILURE
//! ```

use std::sync::Mutex;

use crate::core::process::{ProcessBuilder, ProcessOutput, ProcessRunner};
use crate::error::{MobResult, ProcessError};

/// A recorded invocation.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub(crate) args: String,
    pub(crate) stdin: Option<String>,
    pub(crate) env: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    rules: Mutex<Vec<(String, ProcessOutput)>>,
    calls: Mutex<Vec<Call>>,
    dry: bool,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reports dry mode to callers. Every invocation is still recorded.
    pub(crate) fn dry(mut self) -> Self {
        self.dry = true;
        self
    }

    /// Scripts the result of every invocation whose arguments start with `prefix`.
    pub(crate) fn respond(self, prefix: &str, exit_code: i32, stdout: &str) -> Self {
        self.set_response(prefix, exit_code, stdout);
        self
    }

    /// Same as `respond`, usable after the runner has been shared. Later rules win.
    pub(crate) fn set_response(&self, prefix: &str, exit_code: i32, stdout: &str) {
        self.rules.lock().expect("rules lock").insert(
            0,
            (
                prefix.to_string(),
                ProcessOutput::new(exit_code, stdout.to_string(), String::new()),
            ),
        );
    }

    /// Arguments of every invocation so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|c| c.args.clone())
            .collect()
    }

    /// Full record of every invocation so far.
    pub(crate) fn records(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Invocations whose arguments start with `prefix`.
    pub(crate) fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, process: &ProcessBuilder) -> MobResult<ProcessOutput> {
        let args = process.arguments().join(" ");
        self.calls.lock().expect("calls lock").push(Call {
            args: args.clone(),
            stdin: process.stdin_content().map(ToString::to_string),
            env: process
                .env_vars()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        });

        let output = self
            .rules
            .lock()
            .expect("rules lock")
            .iter()
            .find(|(prefix, _)| args.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();

        if !output.success() && !process.allows_failure() {
            return Err(ProcessError::NonZeroExit {
                command: process.command_line(),
                code: output.exit_code(),
            }
            .into());
        }

        Ok(output)
    }

    fn is_dry(&self) -> bool {
        self.dry
    }
}
