// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Guarded directory deletion.

use tracing::info;

use crate::cli::delete::DeleteArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::repo::GitRepo;

use super::runner_for;

/// Deletes `args.dir` unless it is a repository with local changes.
///
/// `--ignore-uncommitted-changes` and `global.ignore_uncommitted` both lift
/// the guard.
///
/// # Errors
///
/// Returns an error if the guard refuses or the deletion fails.
pub fn run_delete_command(args: &DeleteArgs, config: &Config) -> Result<()> {
    let runner = runner_for(config);
    let ignore_uncommitted = args.ignore_uncommitted || config.global.ignore_uncommitted;

    GitRepo::delete_directory(&args.dir, &runner, ignore_uncommitted)?;
    info!(path = %args.dir.display(), "deleted");
    Ok(())
}
