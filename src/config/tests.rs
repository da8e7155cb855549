// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::Config;
use crate::logging::LogLevel;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.global.file_log_level, LogLevel::TRACE);
    assert!(config.global.log_file.is_none());
    assert_eq!(config.sync.poll_interval_secs, 1);
    assert_eq!(config.sync.repo_timeout_secs, 900);
    assert_eq!(config.sync.api_page_size, 100);
}

#[test]
fn test_parse_toml() {
    let config = Config::parse(
        r#"
        [global]
        output_log_level = 4
        log_file = "sync.log"

        [sync]
        poll_interval_secs = 30
        repo_timeout_secs = 120
        api_page_size = 50
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(
        config.global.log_file.as_deref(),
        Some(std::path::Path::new("sync.log"))
    );
    assert_eq!(config.sync.poll_interval_secs, 30);
    assert_eq!(config.sync.repo_timeout_secs, 120);
    assert_eq!(config.sync.api_page_size, 50);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::parse(
        r"
        [sync]
        poll_interval_secs = 60
        ",
    )
    .expect("config should parse");

    assert_eq!(config.sync.poll_interval_secs, 60);
    assert_eq!(config.sync.repo_timeout_secs, 900);
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
}

#[test]
fn test_unknown_key_rejected() {
    let result = Config::parse(
        r"
        [sync]
        pol_interval_secs = 60
        ",
    );
    assert!(result.is_err());
}

#[test]
fn test_page_size_out_of_range() {
    for toml in [
        "[sync]\napi_page_size = 0",
        "[sync]\napi_page_size = 101",
    ] {
        assert!(Config::parse(toml).is_err(), "should reject: {toml}");
    }
}

#[test]
fn test_zero_timeout_rejected() {
    assert!(Config::parse("[sync]\nrepo_timeout_secs = 0").is_err());
}

#[test]
fn test_log_level_out_of_range_rejected() {
    assert!(Config::parse("[global]\noutput_log_level = 6").is_err());
}

#[test]
fn test_cli_override_wins() {
    let config = Config::builder()
        .add_toml_str("[sync]\npoll_interval_secs = 60")
        .set("sync.poll_interval_secs", 5_i64)
        .expect("override should apply")
        .build()
        .expect("config should build");
    assert_eq!(config.sync.poll_interval_secs, 5);
}
