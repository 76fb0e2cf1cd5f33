// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config layers --> Logging --> Command Dispatch
//!   Version | Options | Inis | Sync | Git | Delete
//! ```

use std::process::ExitCode;

use mob_sync::cli::global::GlobalOptions;
use mob_sync::cli::{self, Command};
use mob_sync::cmd::config::{run_inis_command, run_options_command};
use mob_sync::cmd::delete::run_delete_command;
use mob_sync::cmd::git::run_git_command;
use mob_sync::cmd::sync::run_sync_command;
use mob_sync::config::Config;
use mob_sync::config::loader::ConfigLoader;
use mob_sync::core::process::ProcessBuilder;
use mob_sync::error::Result;
use mob_sync::git;
use mob_sync::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Config file picked up from the working directory when present.
const DEFAULT_CONFIG_FILE: &str = "mob-sync.toml";

/// Prefix of environment overrides, `MOBSYNC_GLOBAL__DRY=true`.
const ENV_PREFIX: &str = "MOBSYNC";

fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Command::Inis) => {
            run_inis_command(&build_config_loader(&cli.global).format_loaded_files());
            Ok(())
        }
        Some(command) => run_with_config(&cli.global, command),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_with_config(global: &GlobalOptions, command: &Command) -> Result<()> {
    let config = load_config(global)?;
    let _log_guard = start_logging(&config)?;
    resolve_git_binary(&config);

    match command {
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Sync(args) => run_sync_command(args, &config),
        Command::Git(args) => run_git_command(args, &config),
        Command::Delete(args) => run_delete_command(args, &config),
        Command::Version | Command::Inis => Ok(()),
    }
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for option in global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }

    loader.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}

fn start_logging(config: &Config) -> Result<LogGuard> {
    let log_file = &config.global.log_file;
    let log_config = LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            (!log_file.as_os_str().is_empty()).then(|| log_file.display().to_string()),
        )
        .build();

    init_logging(&log_config)
}

/// Resolves `git.binary` through PATH, keeping it as given when not found.
fn resolve_git_binary(config: &Config) {
    let configured = &config.git.binary;
    let resolved = configured
        .to_str()
        .and_then(ProcessBuilder::find)
        .unwrap_or_else(|| configured.clone());

    tracing::debug!(git = %resolved.display(), "using git binary");
    git::cmd::set_binary(resolved);
}
