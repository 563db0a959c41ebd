//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    CONFIG_DIR_NAME, DB_PATH, DEFAULT_USER_AGENT, KEYS_FILE_NAME, PROVIDER_TIMEOUT_SECS,
    REGISTRY_TIMEOUT_SECS, WIFIDB_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use wifi_locator::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/ranges.db"),
///     provider_timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Range cache path (SQLite file)
    pub db_path: PathBuf,

    /// API key store (JSON file)
    pub keys_path: PathBuf,

    /// Connect/read timeout for geolocation providers, in seconds
    pub provider_timeout_seconds: u64,

    /// Connect/read timeout for WifiDB, in seconds
    pub wifidb_timeout_seconds: u64,

    /// Connect/read timeout for RDAP and WHOIS, in seconds
    pub registry_timeout_seconds: u64,

    /// User-Agent for providers that do not require a specific one
    pub user_agent: String,

    /// Optional JSON file replacing the built-in coordinate reject rules
    pub reject_rules: Option<PathBuf>,

    /// Print results as JSON instead of plain text
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            keys_path: default_keys_path(),
            provider_timeout_seconds: PROVIDER_TIMEOUT_SECS,
            wifidb_timeout_seconds: WIFIDB_TIMEOUT_SECS,
            registry_timeout_seconds: REGISTRY_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reject_rules: None,
            json_output: false,
        }
    }
}

/// Location of the key store when `--keys-file` is not given.
///
/// `$XDG_CONFIG_HOME/wifi_locator/keys.json`, falling back to
/// `$HOME/.config/wifi_locator/keys.json`, then to the working directory.
pub fn default_keys_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
    match base {
        Some(dir) => dir.join(CONFIG_DIR_NAME).join(KEYS_FILE_NAME),
        None => PathBuf::from(KEYS_FILE_NAME),
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Geolocate an access point
/// wifi_locator mac 00:11:22:33:44:55
///
/// # Geolocate by network name, JSON output
/// wifi_locator --json ssid "Freifunk"
///
/// # Resolve registry ranges
/// wifi_locator range 8.8.8.8 193.0.6.139
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "wifi_locator",
    version,
    about = "Locates WiFi access points and resolves IPv4 registry ranges."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Range cache path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// API key store (defaults to ~/.config/wifi_locator/keys.json)
    #[arg(long, value_parser, global = true)]
    pub keys_file: Option<PathBuf>,

    /// Provider connect/read timeout in seconds
    #[arg(long, default_value_t = PROVIDER_TIMEOUT_SECS, global = true)]
    pub timeout_seconds: u64,

    /// WifiDB connect/read timeout in seconds
    #[arg(long, default_value_t = WIFIDB_TIMEOUT_SECS, global = true)]
    pub wifidb_timeout_seconds: u64,

    /// RDAP and WHOIS connect/read timeout in seconds
    #[arg(long, default_value_t = REGISTRY_TIMEOUT_SECS, global = true)]
    pub registry_timeout_seconds: u64,

    /// JSON file with coordinate reject rules (replaces the built-in list)
    #[arg(long, value_parser, global = true)]
    pub reject_rules: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Geolocate an access point by BSSID (MAC address)
    Mac {
        /// BSSID, e.g. 00:11:22:33:44:55
        bssid: String,
    },
    /// Geolocate an access point by network name
    Ssid {
        /// Network name
        ssid: String,
    },
    /// Resolve the registry range owning each IPv4 address
    Range {
        /// Dotted-quad IPv4 addresses
        #[arg(required = true)]
        ips: Vec<String>,
    },
    /// Inspect or empty the range cache
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Show or store provider API keys
    #[command(subcommand)]
    Keys(KeysCommand),
}

/// `cache` subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// List cached ranges
    List,
    /// Delete every cached range
    Clear,
}

/// `keys` subcommands.
#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// Show which keys are configured (values are masked)
    Show,
    /// Store keys; omitted flags keep their current value, empty strings clear
    Set(SetKeys),
}

/// Key values for `keys set`.
#[derive(Debug, Args)]
pub struct SetKeys {
    /// Wigle API key (Basic auth token)
    #[arg(long)]
    pub wigle: Option<String>,
    /// Google Geolocation API key
    #[arg(long)]
    pub google: Option<String>,
    /// Combain API key
    #[arg(long)]
    pub combain: Option<String>,
    /// Yandex Locator API key
    #[arg(long)]
    pub yandex: Option<String>,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            log_level: cli.log_level.clone(),
            log_format: cli.log_format.clone(),
            db_path: cli.db_path.clone(),
            keys_path: cli.keys_file.clone().unwrap_or_else(default_keys_path),
            provider_timeout_seconds: cli.timeout_seconds,
            wifidb_timeout_seconds: cli.wifidb_timeout_seconds,
            registry_timeout_seconds: cli.registry_timeout_seconds,
            reject_rules: cli.reject_rules.clone(),
            json_output: cli.json,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.provider_timeout_seconds, 10);
        assert_eq!(config.wifidb_timeout_seconds, 30);
        assert_eq!(config.registry_timeout_seconds, 10);
        assert_eq!(config.db_path, PathBuf::from("./wifi_locator.db"));
        assert!(config.reject_rules.is_none());
        assert!(!config.json_output);
    }

    #[test]
    fn test_cli_parses_mac_command() {
        let cli = Cli::try_parse_from(["wifi_locator", "mac", "00:11:22:33:44:55"])
            .expect("mac command should parse");
        match cli.command {
            Command::Mac { ref bssid } => assert_eq!(bssid, "00:11:22:33:44:55"),
            ref other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wifi_locator",
            "range",
            "8.8.8.8",
            "--json",
            "--db-path",
            "/tmp/r.db",
            "--timeout-seconds",
            "3",
        ])
        .expect("range command should parse");
        let config = Config::from(&cli);
        assert!(config.json_output);
        assert_eq!(config.db_path, PathBuf::from("/tmp/r.db"));
        assert_eq!(config.provider_timeout_seconds, 3);
        assert_eq!(config.wifidb_timeout_seconds, 30);
    }

    #[test]
    fn test_cli_range_requires_ip() {
        assert!(Cli::try_parse_from(["wifi_locator", "range"]).is_err());
    }

    #[test]
    fn test_cli_keys_set() {
        let cli = Cli::try_parse_from(["wifi_locator", "keys", "set", "--google", "abc"])
            .expect("keys set should parse");
        match cli.command {
            Command::Keys(KeysCommand::Set(ref keys)) => {
                assert_eq!(keys.google.as_deref(), Some("abc"));
                assert!(keys.wigle.is_none());
            }
            ref other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_keys_file_flag_overrides_default() {
        let cli = Cli::try_parse_from(["wifi_locator", "--keys-file", "/tmp/k.json", "keys", "show"])
            .expect("keys show should parse");
        assert_eq!(Config::from(&cli).keys_path, PathBuf::from("/tmp/k.json"));
    }

    #[test]
    fn test_timeout_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "wifi_locator",
            "range",
            "8.8.8.8",
            "--timeout-seconds",
            "3",
            "--wifidb-timeout-seconds",
            "45",
            "--registry-timeout-seconds",
            "7",
        ])
        .expect("timeout flags should parse");
        let config = Config::from(&cli);
        assert_eq!(config.provider_timeout_seconds, 3);
        assert_eq!(config.wifidb_timeout_seconds, 45);
        assert_eq!(config.registry_timeout_seconds, 7);

        let defaults = Config::from(&Cli::try_parse_from(["wifi_locator", "cache", "list"]).unwrap());
        assert_eq!(defaults.wifidb_timeout_seconds, WIFIDB_TIMEOUT_SECS);
        assert_eq!(defaults.registry_timeout_seconds, REGISTRY_TIMEOUT_SECS);
    }
}
