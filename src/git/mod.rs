// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git synchronization layer.
//!
//! ```text
//!   ops.rs (many repos)     sync/ (one repo)     submodule/ (worker)
//!          \                    |                    /
//!           v                   v                   v
//!        ,-----------------------------------------------,
//!        |  repo.rs   GitRepo { root, runner }            |
//!        |  clone/pull, remotes, .ts files, delete guard  |
//!        '----------------------+------------------------'
//!                               |
//!                               v
//!                  cmd.rs   ProcessBuilder per command
//!                               |
//!                               v
//!                  core::process::ProcessRunner
//! ```
//!
//! Every git invocation is a subprocess. Read-only queries carry
//! `ProcessFlags::QUERY` so they still run in dry mode; tolerant ones carry
//! `ProcessFlags::ALLOW_FAILURE` and report through their exit code.

pub mod cmd;
pub mod discovery;
pub mod ops;
pub mod repo;
pub mod submodule;
pub mod sync;
pub mod url;

#[cfg(test)]
pub(crate) mod test_utils;
