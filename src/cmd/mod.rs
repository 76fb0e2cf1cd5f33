// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis), delete, git, sync
//! ```

pub mod config;
pub mod delete;
pub mod git;
pub mod sync;

use crate::config::Config;
use crate::core::process::DirectRunner;

/// The process runner selected by `global.dry`.
#[must_use]
pub const fn runner_for(config: &Config) -> DirectRunner {
    if config.global.dry {
        DirectRunner::dry_run()
    } else {
        DirectRunner::new()
    }
}
