// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! walk:   find_files()     ignore::WalkParallel + wax glob
//!         WalkOptions      max_depth, hidden, gitignore, skip_dirs
//! remove: remove_dir_all() missing is fine, clears read-only, dry mode
//! ```

pub mod remove;
pub mod walk;
