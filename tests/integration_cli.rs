// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the command line.
//!
//! Parses realistic argument patterns, then runs the built binary in a
//! scratch directory for the commands that need no network.

use clap::Parser;
use mob_sync::cli::git::GitSubcommand;
use mob_sync::cli::global::GlobalOptions;
use mob_sync::cli::{Cli, Command};
use mob_sync::core::process::ProcessBuilder;
use std::fs;
use std::path::Path;
use std::process::{Command as Process, Output};

fn mob_sync(args: &[&str], cwd: &Path) -> Output {
    Process::new(env!("CARGO_BIN_EXE_mob-sync"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MOBSYNC_GLOBAL__DRY")
        .output()
        .expect("failed to run mob-sync")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["mob-sync", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["mob-sync", "--dry"]).unwrap();
    assert!(cli.command.is_none());
    assert!(cli.global.dry);
}

#[test]
fn cli_global_options_to_config_overrides() {
    let opts = GlobalOptions {
        dry: true,
        log_level: Some(4),
        options: vec!["paths/build=/mo2/build".to_string()],
        ..GlobalOptions::default()
    };

    assert_eq!(
        opts.to_config_overrides(),
        [
            "paths/build=/mo2/build",
            "global/output_log_level=4",
            "global/file_log_level=4",
            "global/dry=true",
        ]
    );
}

#[test]
fn cli_git_set_remotes_with_key() {
    let cli = Cli::try_parse_from([
        "mob-sync",
        "git",
        "set-remotes",
        "--username",
        "myuser",
        "--email",
        "user@example.com",
        "--key",
        "/keys/me.ppk",
    ])
    .unwrap();

    let Some(Command::Git(git)) = cli.command else {
        panic!("expected git");
    };
    let GitSubcommand::SetRemotes(args) = git.subcommand else {
        panic!("expected set-remotes");
    };
    assert_eq!(args.key.as_deref(), Some(Path::new("/keys/me.ppk")));
    assert!(!args.no_push);
    assert!(args.path.is_none());
}

#[test]
fn cli_branch_exists_requires_both_arguments() {
    assert!(
        Cli::try_parse_from(["mob-sync", "git", "branch-exists", "https://example.com/x.git"])
            .is_err()
    );
}

#[test]
fn cli_delete_requires_directory() {
    assert!(Cli::try_parse_from(["mob-sync", "delete"]).is_err());
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn binary_prints_version() {
    let temp = tempfile::tempdir().unwrap();
    let output = mob_sync(&["version"], temp.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn binary_lists_inis() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("mob-sync.toml"), "[global]\ndry = true\n").unwrap();

    let output = mob_sync(&["inis"], temp.path());

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1. [optional] mob-sync.toml");
}

#[test]
fn binary_options_apply_set_overrides() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(
        temp.path().join("mob-sync.toml"),
        "[paths]\nbuild = \"/mo2/build\"\n",
    )
    .unwrap();

    let output = mob_sync(
        &["-l", "0", "-s", "git/remote_org=forker", "options"],
        temp.path(),
    );

    assert!(output.status.success());
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines.iter().any(|l| l.starts_with("git.remote_org") && l.ends_with("= forker")));
    assert!(lines.iter().any(|l| l.starts_with("paths.build") && l.ends_with("= /mo2/build")));
    assert!(lines.iter().any(|l| l.starts_with("global.output_log_level") && l.ends_with("= 0")));
}

#[test]
fn binary_rejects_bad_set_option() {
    let temp = tempfile::tempdir().unwrap();
    let output = mob_sync(&["-s", "no-equals-sign", "options"], temp.path());

    assert!(!output.status.success());
}

#[test]
fn binary_sync_unknown_repo_fails() {
    let temp = tempfile::tempdir().unwrap();
    let output = mob_sync(
        &["-l", "0", "-s", "paths/build=build", "sync", "nope"],
        temp.path(),
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown repo 'nope'"));
}

#[test]
fn binary_git_failure_is_reported_once() {
    let temp = tempfile::tempdir().unwrap();
    let output = mob_sync(
        &["-l", "0", "git", "set-remotes", "-u", "forker", "-e", "f@example.com", "missing"],
        temp.path(),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Error:").count(), 1, "{stderr}");
    assert!(!stderr.contains("Failed to set remotes"), "{stderr}");
    assert!(stderr.contains("failed to set credentials in missing"), "{stderr}");
}

#[test]
fn binary_deletes_plain_directory() {
    // the repository check needs git
    if !ProcessBuilder::exists("git") {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let doomed = temp.path().join("doomed");
    fs::create_dir_all(doomed.join("inner")).unwrap();
    fs::write(doomed.join("inner/file.txt"), "x").unwrap();

    let output = mob_sync(&["-l", "0", "delete", "doomed"], temp.path());

    assert!(output.status.success());
    assert!(!doomed.exists());
}

#[test]
fn binary_dry_delete_keeps_directory() {
    // the repository check needs git
    if !ProcessBuilder::exists("git") {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let kept = temp.path().join("kept");
    fs::create_dir_all(&kept).unwrap();

    let output = mob_sync(&["-l", "0", "--dry", "delete", "kept"], temp.path());

    assert!(output.status.success());
    assert!(kept.exists());
}
