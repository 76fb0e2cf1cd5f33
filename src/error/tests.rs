// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitError, MobError, MobResult, ProcessError, bail_out};

#[test]
fn test_uncommitted_changes_message_names_override() {
    let err = GitError::UncommittedChanges {
        path: "/build/usvfs".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"will not delete /build/usvfs, has uncommitted changes; see --ignore-uncommitted-changes"
    );
}

#[test]
fn test_bad_remote_url_message() {
    let err: MobError = GitError::BadRemoteUrl {
        output: "nonsense".to_string(),
    }
    .into();
    insta::assert_snapshot!(err.to_string(), @"git error: bad get-url output 'nonsense'");
}

#[test]
fn test_non_zero_exit_boxes_into_process_variant() {
    let err: MobError = ProcessError::NonZeroExit {
        command: "git pull".to_string(),
        code: 1,
    }
    .into();
    assert!(matches!(err, MobError::Process(_)));
    assert!(!err.is_bailed());
}

#[test]
fn test_bail_out_is_bailed() {
    let err = bail_out("git missing parameters");
    assert!(err.is_bailed());
    insta::assert_snapshot!(err.to_string(), @"fatal error: git missing parameters");
}

#[test]
fn test_mob_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<MobError>();
    assert!(size <= 24, "MobError is {size} bytes, expected <= 24");
}

#[test]
fn test_mob_result_size() {
    let size = std::mem::size_of::<MobResult<()>>();
    assert!(size <= 24, "MobResult<()> is {size} bytes, expected <= 24");
}
