// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command implementation for mob-sync.

use crate::cli::git::{GitArgs, GitSubcommand, IgnoreTsState};
use crate::config::Config;
use crate::core::process::DirectRunner;
use crate::error::{Result, bail_out};
use crate::git::discovery::target_repos;
use crate::git::ops::{
    add_remote_to_repos, list_branches, revert_ts_for_all, set_ignore_ts, set_remotes_for_all,
};
use crate::git::repo::{GitRepo, RemoteSetup};

use super::runner_for;

/// Main handler for git command.
///
/// # Errors
///
/// Returns an error if any git operation fails, or if `branch-exists` finds
/// no such branch.
pub fn run_git_command(args: &GitArgs, config: &Config) -> Result<()> {
    let runner = runner_for(config);

    match &args.subcommand {
        GitSubcommand::SetRemotes(sr) => {
            let repos = target_repos(config, &runner, sr.path.as_deref())?;
            let setup = RemoteSetup::builder()
                .org(sr.username.as_str())
                .maybe_key(sr.key.clone())
                .no_push_upstream(sr.no_push)
                .push_default_origin(sr.push_default)
                .url_pattern(config.git.url_pattern.clone())
                .build();
            set_remotes_for_all(&repos, &runner, &sr.username, &sr.email, &setup)
        }
        GitSubcommand::AddRemote(ar) => {
            let repos = target_repos(config, &runner, ar.path.as_deref())?;
            add_remote_to_repos(
                &repos,
                &runner,
                &ar.name,
                &ar.username,
                ar.key.as_deref(),
                ar.push_default,
                &config.git.url_pattern,
            )
        }
        GitSubcommand::IgnoreTs(it) => {
            let enable = it.state == IgnoreTsState::On;
            let repos = target_repos(config, &runner, None)?;
            let count = set_ignore_ts(&repos, &runner, enable)?;
            print_ts_count(&runner, if enable { "set" } else { "unset" }, count);
            Ok(())
        }
        GitSubcommand::RevertTs => {
            let repos = target_repos(config, &runner, None)?;
            let count = revert_ts_for_all(&repos, &runner)?;
            print_ts_count(&runner, "revert", count);
            Ok(())
        }
        GitSubcommand::Branches(br) => {
            let repos = target_repos(config, &runner, None)?;
            for (path, branch) in list_branches(&repos, &runner)? {
                let repo_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("unknown");
                if !br.all && (branch == "master" || branch == "main") {
                    continue;
                }
                println!("{repo_name:30} {branch}");
            }
            Ok(())
        }
        GitSubcommand::BranchExists(be) => {
            if GitRepo::remote_branch_exists(&be.url, &be.branch, &runner)? {
                println!("{} exists on {}", be.branch, be.url);
                Ok(())
            } else {
                Err(bail_out(format!("branch '{}' not found on {}", be.branch, be.url)).into())
            }
        }
    }
}

fn print_ts_count(runner: &DirectRunner, action: &str, count: usize) {
    use crate::core::process::ProcessRunner as _;

    if runner.is_dry() {
        println!("Would {action} {count} .ts files");
    } else {
        println!("{action}: {count} .ts files");
    }
}
