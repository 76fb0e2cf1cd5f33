// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Submodule attachment, run in the background.
//!
//! ```text
//! producers                     worker thread "submodule_adder"
//!   handle.enqueue(request) --> flume channel --> recv (blocks)
//!   queue.stop() ------------->  Wake           drain snapshot into a batch
//!                                               for each: quit? --> exit
//!                                                         request.run()
//!                                                         Err --> log, exit
//! ```

mod queue;

use bon::Builder;
use std::path::{Path, PathBuf};

use super::repo::GitRepo;
use crate::core::process::ProcessRunner;
use crate::error::MobResult;

pub use queue::{SubmoduleQueue, SubmoduleQueueHandle, WorkerState};

/// Adds `url` as submodule `name` of the repository at `root`.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct SubmoduleRequest {
    #[builder(into)]
    url: String,
    #[builder(into, default = String::from("master"))]
    branch: String,
    /// Submodule name, also its directory inside `root`.
    #[builder(into)]
    name: String,
    /// Parent repository.
    #[builder(into)]
    root: PathBuf,
}

impl SubmoduleRequest {
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs `git submodule add` in the parent repository.
    ///
    /// # Errors
    ///
    /// Returns an error if git fails.
    pub fn run(&self, runner: &dyn ProcessRunner) -> MobResult<()> {
        GitRepo::new(&self.root, runner).add_submodule(&self.branch, &self.name, &self.url)
    }
}

#[cfg(test)]
mod tests;
