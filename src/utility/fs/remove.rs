// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{FsError, MobResult};

/// Recursively deletes `dir`.
///
/// A missing directory is not an error. Read-only entries (git marks pack
/// files read-only on Windows) are made writable and the delete is retried once.
///
/// # Errors
///
/// Returns `FsError::IoError` if the directory cannot be removed.
pub fn remove_dir_all(dir: &Path, dry: bool) -> MobResult<()> {
    if !dir.exists() {
        trace!(path = %dir.display(), "not deleting, doesn't exist");
        return Ok(());
    }

    if dry {
        debug!(path = %dir.display(), "(dry) deleting directory");
        return Ok(());
    }

    debug!(path = %dir.display(), "deleting directory");

    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            debug!(path = %dir.display(), "access denied, clearing read-only flags");
            clear_readonly(dir).map_err(|source| io_error(dir, source))?;
            std::fs::remove_dir_all(dir).map_err(|source| io_error(dir, source).into())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_error(dir, source).into()),
    }
}

fn io_error(dir: &Path, source: std::io::Error) -> FsError {
    FsError::IoError {
        path: dir.display().to_string(),
        source,
    }
}

#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(dir: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            clear_readonly(&path)?;
        } else if metadata.permissions().readonly() {
            let mut permissions = metadata.permissions();
            permissions.set_readonly(false);
            std::fs::set_permissions(&path, permissions)?;
        }
    }
    Ok(())
}
