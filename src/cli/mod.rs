// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for mob-sync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! mob-sync [global options] <command>
//! version | options | inis
//! sync [repos...]
//! git {set-remotes|add-remote|ignore-ts|revert-ts|branches|branch-exists}
//! delete DIR
//! ```

pub mod delete;
pub mod git;
pub mod global;
pub mod sync;


use crate::cli::delete::DeleteArgs;
use crate::cli::git::GitArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::sync::SyncArgs;
use clap::{Parser, Subcommand};

/// `ModOrganizer` Build Tool - source synchronization
///
/// Clones, updates and maintains the git repositories of a `ModOrganizer2` build.
#[derive(Debug, Parser)]
#[command(
    name = "mob-sync",
    author,
    version,
    about = "ModOrganizer Build Tool - source synchronization",
    long_about = "mob-sync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones, updates and maintains the git repositories of a\n\
                  ModOrganizer2 build.\n\n\
                  `mob-sync sync` clones or pulls every repository listed in the\n\
                  configuration. See `mob-sync <command> --help` for more\n\
                  information about a command.",
    after_help = "INI FILES:\n\n\
                  mob-sync loads `mob-sync.toml` from the current directory if it\n\
                  exists. Additional files can be given with --ini, those are\n\
                  loaded after it. MOBSYNC_SECTION__KEY environment variables and\n\
                  --set options override all files."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values from the INIs.
    Options,

    /// Lists the INIs used by mob-sync.
    Inis,

    /// Clones or pulls the configured repositories.
    Sync(SyncArgs),

    /// Manages the git repos.
    Git(GitArgs),

    /// Deletes a directory, refusing repositories with local changes.
    Delete(DeleteArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
