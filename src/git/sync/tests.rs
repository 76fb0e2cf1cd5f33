// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{SyncMode, SyncOperation, SyncOutcome};
use crate::error::{GitError, MobError};
use crate::git::repo::RemoteSetup;
use crate::git::test_utils::RecordingRunner;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_clone_when_no_dot_git() {
    let temp = temp_dir();
    let root = temp.path().join("repo");
    let runner = RecordingRunner::new();

    let outcome = SyncOperation::builder()
        .url("git@host:org/repo.git")
        .branch("main")
        .root(&root)
        .shallow(true)
        .build()
        .run(&runner)
        .expect("clone should succeed");

    assert_eq!(outcome, SyncOutcome::Cloned);
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        format!(
            "clone --recurse-submodules --depth 1 --branch main --quiet \
             -c advice.detachedHead=false git@host:org/repo.git {}",
            root.display()
        )
    );
}

#[test]
fn test_pull_when_dot_git_exists() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join(".git")).expect("create .git");
    let runner = RecordingRunner::new();

    let outcome = SyncOperation::builder()
        .url("https://example.com/repo.git")
        .root(temp.path())
        .build()
        .run(&runner)
        .expect("pull should succeed");

    assert_eq!(outcome, SyncOutcome::Pulled);
    insta::assert_debug_snapshot!(runner.calls(), @r#"
    [
        "pull --recurse-submodules --quiet https://example.com/repo.git master",
    ]
    "#);
}

#[test]
fn test_clone_mode_skips_existing_repo() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join(".git")).expect("create .git");
    let runner = RecordingRunner::new();

    let outcome = SyncOperation::builder()
        .url("https://example.com/repo.git")
        .root(temp.path())
        .mode(SyncMode::Clone)
        .build()
        .run(&runner)
        .expect("skip should succeed");

    assert_eq!(outcome, SyncOutcome::Skipped);
    assert!(runner.calls().is_empty());
}

#[test]
fn test_pull_mode_reverts_ts_first() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("app_en.ts"), "").expect("write ts");
    let runner = RecordingRunner::new();

    let outcome = SyncOperation::builder()
        .url("https://example.com/repo.git")
        .root(temp.path())
        .mode(SyncMode::Pull)
        .revert_ts_on_pull(true)
        .build()
        .run(&runner)
        .expect("pull should succeed");

    assert_eq!(outcome, SyncOutcome::Pulled);
    insta::assert_debug_snapshot!(runner.calls(), @r#"
    [
        "ls-files --error-unmatch app_en.ts",
        "checkout app_en.ts",
        "pull --recurse-submodules --quiet https://example.com/repo.git master",
    ]
    "#);
}

#[test]
fn test_clone_applies_credentials_and_remotes() {
    let temp = temp_dir();
    let root = temp.path().join("repo");
    let runner = RecordingRunner::new()
        .respond("config remote.upstream.url", 1, "")
        .respond("config remote.origin.url", 1, "")
        .respond("remote get-url origin", 0, "git@github.com:acme/repo.git\n");

    SyncOperation::builder()
        .url("git@github.com:acme/repo.git")
        .root(&root)
        .email("dev@example.com")
        .remotes(
            RemoteSetup::builder()
                .org("forker")
                .push_default_origin(true)
                .build(),
        )
        .build()
        .run(&runner)
        .expect("clone should succeed");

    let calls = runner.calls();
    assert!(calls[0].starts_with("clone "));
    insta::assert_debug_snapshot!(&calls[1..], @r#"
    [
        "config user.email dev@example.com",
        "config remote.upstream.url",
        "remote get-url origin",
        "remote rename origin upstream",
        "config remote.origin.url",
        "remote add origin git@github.com:forker/repo.git",
        "config remote.pushdefault origin",
    ]
    "#);
}

#[test]
fn test_dry_clone_skips_remotes_without_work_tree() {
    let temp = temp_dir();
    let root = temp.path().join("repo");
    let runner = RecordingRunner::new().dry();

    let outcome = SyncOperation::builder()
        .url("git@github.com:acme/repo.git")
        .root(&root)
        .remotes(RemoteSetup::builder().org("forker").build())
        .build()
        .run(&runner)
        .expect("dry clone should succeed");

    assert_eq!(outcome, SyncOutcome::Cloned);
    assert!(runner.calls_starting_with("config remote.").is_empty());
    assert!(runner.calls_starting_with("remote ").is_empty());
    assert!(!root.exists());
}

#[test]
fn test_empty_org_skips_remotes() {
    let temp = temp_dir();
    let runner = RecordingRunner::new();

    SyncOperation::builder()
        .url("git@github.com:acme/repo.git")
        .root(temp.path().join("repo"))
        .remotes(RemoteSetup::builder().org("").build())
        .build()
        .run(&runner)
        .expect("clone should succeed");

    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn test_missing_parameters_are_fatal() {
    let runner = RecordingRunner::new();

    let err = SyncOperation::builder()
        .root("/build/usvfs")
        .build()
        .run(&runner)
        .expect_err("missing url should fail");
    assert!(matches!(
        err,
        MobError::Git(ref e) if matches!(**e, GitError::MissingParameters { missing: "url" })
    ));

    let err = SyncOperation::builder()
        .url("https://example.com/repo.git")
        .build()
        .run(&runner)
        .expect_err("missing root should fail");
    insta::assert_snapshot!(err.to_string(), @"git error: git missing parameters (root)");

    assert!(runner.calls().is_empty());
}

#[test]
fn test_failed_clone_stops_the_operation() {
    let temp = temp_dir();
    let runner = RecordingRunner::new().respond("clone", 128, "");

    let result = SyncOperation::builder()
        .url("git@github.com:acme/repo.git")
        .root(temp.path().join("repo"))
        .username("dev")
        .build()
        .run(&runner);

    assert!(result.is_err());
    assert_eq!(runner.calls().len(), 1);
}
