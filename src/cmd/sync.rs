// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command.
//!
//! ```text
//! sync [REPO...]
//!   for each repo: SyncOperation (clone | pull)
//!   cloned + submodule_of --> SubmoduleQueue ("submodule_adder")
//!   finish: wait for queued submodules
//! ```

use std::sync::Arc;

use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::core::process::{ProcessRunner, TaskRunner};
use crate::error::Result;
use crate::git::ops::sync_repos;
use crate::git::sync::SyncOutcome;

use super::runner_for;

/// Clones or pulls the configured repositories.
///
/// # Errors
///
/// Returns an error if a repository is unknown or fails to sync.
pub fn run_sync_command(args: &SyncArgs, config: &Config) -> Result<()> {
    let runner = runner_for(config);
    let submodule_runner: Arc<dyn ProcessRunner> =
        Arc::new(TaskRunner::new("submodule_adder", runner));

    let outcomes = sync_repos(config, &runner, submodule_runner, &args.repos)?;

    if outcomes.is_empty() {
        println!("No repositories configured");
    }

    for (name, outcome) in outcomes {
        let action = match outcome {
            SyncOutcome::Cloned => "cloned",
            SyncOutcome::Pulled => "pulled",
            SyncOutcome::Skipped => "skipped",
        };
        println!("{name:30} {action}");
    }

    Ok(())
}
