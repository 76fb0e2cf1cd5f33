// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Blocking process spawning.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .stderr_level() .flag(ALLOW_FAILURE)
//!       --> ProcessRunner::run()
//!           std::process::Command
//!           stream stdout/stderr into tracing
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
pub mod runner;

pub use builder::{LineFilter, ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
pub use runner::{DirectRunner, ProcessRunner, TaskRunner};
