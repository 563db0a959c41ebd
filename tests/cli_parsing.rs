//! Tests for CLI subcommand parsing.

use clap::Parser;
use std::path::PathBuf;
use wifi_locator::config::{CacheCommand, Cli, Command, KeysCommand};
use wifi_locator::Config;

#[test]
fn test_ssid_with_spaces() {
    let cli = Cli::try_parse_from(["wifi_locator", "ssid", "Free WiFi"]).unwrap();
    match cli.command {
        Command::Ssid { ssid } => assert_eq!(ssid, "Free WiFi"),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_range_accepts_many_ips() {
    let cli = Cli::try_parse_from(["wifi_locator", "range", "8.8.8.8", "1.1.1.1", "10.0.0.1"]).unwrap();
    match cli.command {
        Command::Range { ips } => assert_eq!(ips.len(), 3),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_cache_subcommands() {
    let list = Cli::try_parse_from(["wifi_locator", "cache", "list"]).unwrap();
    assert!(matches!(list.command, Command::Cache(CacheCommand::List)));
    let clear = Cli::try_parse_from(["wifi_locator", "cache", "clear"]).unwrap();
    assert!(matches!(clear.command, Command::Cache(CacheCommand::Clear)));
}

#[test]
fn test_keys_set_all_flags() {
    let cli = Cli::try_parse_from([
        "wifi_locator",
        "keys",
        "set",
        "--wigle",
        "w",
        "--google",
        "g",
        "--combain",
        "c",
        "--yandex",
        "y",
    ])
    .unwrap();
    match cli.command {
        Command::Keys(KeysCommand::Set(keys)) => {
            assert_eq!(keys.wigle.as_deref(), Some("w"));
            assert_eq!(keys.yandex.as_deref(), Some("y"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_reject_rules_and_json_flags() {
    let cli = Cli::try_parse_from([
        "wifi_locator",
        "--json",
        "--reject-rules",
        "/tmp/rules.json",
        "mac",
        "00:11:22:33:44:55",
    ])
    .unwrap();
    let config = Config::from(&cli);
    assert!(config.json_output);
    assert_eq!(config.reject_rules, Some(PathBuf::from("/tmp/rules.json")));
}

#[test]
fn test_missing_subcommand_is_error() {
    assert!(Cli::try_parse_from(["wifi_locator"]).is_err());
    assert!(Cli::try_parse_from(["wifi_locator", "mac"]).is_err());
}
