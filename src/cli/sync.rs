// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command arguments.

use clap::Args;

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Repositories to sync, by their `[repos.<name>]` name. All when empty.
    #[arg(value_name = "REPO")]
    pub repos: Vec<String>,
}
