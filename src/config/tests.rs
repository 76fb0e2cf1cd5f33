// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Config, ConfigLoader};
use crate::config::types::RepoConfig;
use crate::logging::LogLevel;
use std::io::Write as _;
use std::path::{Path, PathBuf};

const REPOS: &str = r#"
[paths]
build = "/mo2/build"

[repos.usvfs]
url = "https://github.com/ModOrganizer2/usvfs.git"
branch = "main"

[repos.uibase]
url = "https://github.com/ModOrganizer2/modorganizer-uibase.git"
path = "modorganizer_super/uibase"
submodule_of = "modorganizer_super"
shallow = false
"#;

#[test]
fn test_default_config() {
    let config = Config::default();
    insta::assert_yaml_snapshot!(
        serde_json::json!({
            "global.dry": config.global.dry,
            "global.output_log_level": config.global.output_log_level.as_u8(),
            "git.binary": config.git.binary,
            "git.url_pattern": config.git.url_pattern.as_str(),
            "git.shallow": config.git.shallow,
            "git.ignore_ts": config.git.ignore_ts,
            "git.revert_ts": config.git.revert_ts,
        }),
        @r#"
    git.binary: git
    git.ignore_ts: true
    git.revert_ts: false
    git.shallow: true
    git.url_pattern: "git@github.com:{org}/{file}"
    global.dry: false
    global.output_log_level: 3
    "#
    );
}

#[test]
fn test_config_parse_repos() {
    let config = Config::parse(REPOS).expect("valid config");

    assert_eq!(config.repos.len(), 2);
    let usvfs = &config.repos["usvfs"];
    assert_eq!(usvfs.branch, "main");
    assert_eq!(
        config.repo_root("usvfs", usvfs).expect("build dir set"),
        Path::new("/mo2/build/usvfs")
    );
    assert!(config.shallow(usvfs));

    let uibase = &config.repos["uibase"];
    assert_eq!(
        uibase,
        &RepoConfig {
            url: "https://github.com/ModOrganizer2/modorganizer-uibase.git".to_string(),
            branch: "master".to_string(),
            path: Some(PathBuf::from("modorganizer_super/uibase")),
            submodule_of: Some(PathBuf::from("modorganizer_super")),
            shallow: Some(false),
        }
    );
    assert_eq!(
        config.repo_root("uibase", uibase).expect("build dir set"),
        Path::new("/mo2/build/modorganizer_super/uibase")
    );
    assert!(!config.shallow(uibase));
}

#[test]
fn test_build_dir_required() {
    let config = Config::default();
    let err = config.build_dir().expect_err("no build dir");
    insta::assert_snapshot!(err.to_string(), @"paths.build not configured");
}

#[test]
fn test_repo_without_url_is_rejected() {
    let err = Config::parse("[repos.usvfs]\nurl = \"\"\n").expect_err("empty url");
    insta::assert_snapshot!(
        format!("{err:#}"),
        @"missing required config key 'url' in section '[repos.usvfs]'"
    );
}

#[test]
fn test_url_pattern_needs_file_placeholder() {
    let err = Config::parse("[git]\nurl_pattern = \"git@github.com:{org}\"\n")
        .expect_err("pattern without {file}");
    insta::assert_snapshot!(
        format!("{err:#}"),
        @"invalid value for 'url_pattern' in section '[git]': 'git@github.com:{org}' has no {file} placeholder"
    );
}

#[test]
fn test_submodule_must_live_inside_parent() {
    let err = Config::parse(
        "[paths]\nbuild = \"/b\"\n[repos.uibase]\nurl = \"u\"\nsubmodule_of = \"super\"\n",
    )
    .expect_err("default path is beside the parent");
    insta::assert_snapshot!(
        format!("{err:#}"),
        @"invalid value for 'submodule_of' in section '[repos.uibase]': '/b/uibase' is not inside '/b/super'"
    );

    assert!(Config::parse("[repos.super]\nurl = \"u\"\nsubmodule_of = \"super\"\n").is_err());
    assert!(
        Config::parse("[repos.uibase]\nurl = \"u\"\npath = \"super/x/uibase\"\nsubmodule_of = \"super\"\n")
            .is_ok()
    );
}

#[test]
fn test_deny_unknown_fields() {
    assert!(Config::parse("[git]\nshalow = true\n").is_err());
    assert!(Config::parse("[tasks]\nfoo = 1\n").is_err());
    assert!(Config::parse("[repos.usvfs]\nurl = \"u\"\nbrnch = \"x\"\n").is_err());
}

#[test]
fn test_remote_setup_from_git_config() {
    let config = Config::parse(
        r#"
[git]
remote_org = "forker"
remote_key = "/keys/id.ppk"
remote_push_default_origin = true
url_pattern = "https://example.com/{org}/{file}"
"#,
    )
    .expect("valid config");

    let setup = config.git.remote_setup();
    assert_eq!(setup.org(), "forker");
    assert_eq!(setup.key(), Some(Path::new("/keys/id.ppk")));
    assert!(!setup.no_push_upstream());
    assert!(setup.push_default_origin());
    assert_eq!(
        setup.url_pattern().url("forker", "usvfs.git"),
        "https://example.com/forker/usvfs.git"
    );
}

#[test]
fn test_format_options() {
    let mut config = Config::parse(REPOS).expect("valid config");
    config.git.remote_key = Some(PathBuf::from("/secret/key.ppk"));
    config.git.remote_org = "forker".to_string();
    config.git.username = "dev".to_string();
    config.git.email = "dev@example.com".to_string();

    insta::assert_snapshot!(config.format_options().join("\n"), @r"
    git.binary                     = git
    git.email                      = dev@example.com
    git.ignore_ts                  = true
    git.remote_key                 = [hidden]
    git.remote_no_push_upstream    = false
    git.remote_org                 = forker
    git.remote_push_default_origin = false
    git.revert_ts                  = false
    git.shallow                    = true
    git.url_pattern                = git@github.com:{org}/{file}
    git.username                   = dev
    global.dry                     = false
    global.file_log_level          = 5
    global.ignore_uncommitted      = false
    global.log_file                = mob-sync.log
    global.output_log_level        = 3
    paths.build                    = /mo2/build
    repos.uibase.branch            = master
    repos.uibase.path              = modorganizer_super/uibase
    repos.uibase.shallow           = false
    repos.uibase.submodule_of      = modorganizer_super
    repos.uibase.url               = https://github.com/ModOrganizer2/modorganizer-uibase.git
    repos.usvfs.branch             = main
    repos.usvfs.url                = https://github.com/ModOrganizer2/usvfs.git
    ");
}

#[test]
fn test_loader_layers_later_sources_win() {
    let config = ConfigLoader::new()
        .add_toml_str("[global]\ndry = false\noutput_log_level = 2\n")
        .add_toml_str("[global]\ndry = true\n")
        .build()
        .expect("valid config");

    assert!(config.global.dry);
    assert_eq!(config.global.output_log_level, LogLevel::WARN);
}

#[test]
fn test_set_option_overrides_files() {
    let config = ConfigLoader::new()
        .add_toml_str(REPOS)
        .set_option("git/shallow=false")
        .and_then(|l| l.set_option("repos/usvfs/branch=dev"))
        .and_then(|l| l.set_option("global/output_log_level = 5"))
        .and_then(ConfigLoader::build)
        .expect("valid overrides");

    assert!(!config.git.shallow);
    assert_eq!(config.repos["usvfs"].branch, "dev");
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);
}

#[test]
fn test_set_option_rejects_malformed() {
    for option in ["dry", "dry=true", "/dry=true", "global/=true"] {
        let result = ConfigLoader::new().set_option(option);
        assert!(result.is_err(), "{option} should be rejected");
    }
}

#[test]
fn test_add_toml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[paths]\nbuild = \"/from/file\"").expect("write config");

    let loader = ConfigLoader::new().add_toml_file(file.path());
    assert_eq!(loader.loaded_files().len(), 1);

    let config = loader.build().expect("valid config");
    assert_eq!(config.paths.build.as_deref(), Some(Path::new("/from/file")));
}

#[test]
fn test_missing_required_file_fails() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/mob-sync.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_optional_file_only_tracked_when_present() {
    let loader = ConfigLoader::new()
        .add_toml_file_optional("/nonexistent/mob-sync.toml")
        .add_toml_str("[global]\ndry = true");

    insta::assert_debug_snapshot!(loader.format_loaded_files(), @r#"
    [
        "1. [string] <string>",
    ]
    "#);
    assert!(loader.build().expect("valid config").global.dry);
}
