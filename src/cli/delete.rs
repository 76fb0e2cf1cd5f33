// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Delete command arguments.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `delete` command.
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Directory to delete.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Deletes git repositories even when they have uncommitted or stashed
    /// changes.
    #[arg(long = "ignore-uncommitted-changes")]
    pub ignore_uncommitted: bool,
}
