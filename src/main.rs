//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `wifi_locator` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use wifi_locator::app::output::{
    format_keys, format_ranges, format_report, format_report_json, format_resolutions,
    format_resolutions_json,
};
use wifi_locator::config::{CacheCommand, Cli, Command, KeysCommand};
use wifi_locator::initialization::init_logger_with;
use wifi_locator::{
    load_keys, open_range_cache, open_range_manager, run_search, update_keys, Config, LookupError,
    SearchQuery,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load API keys from a .env file next to the working directory or the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = Config::from(&cli);

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(&config, cli.command).await {
        match e.downcast_ref::<LookupError>() {
            Some(LookupError::NoResults) => eprintln!("No results found"),
            _ => eprintln!("wifi_locator error: {:#}", e),
        }
        process::exit(1);
    }
    Ok(())
}

async fn run(config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Mac { bssid } => search(config, SearchQuery::mac(&bssid)?).await,
        Command::Ssid { ssid } => search(config, SearchQuery::ssid(&ssid)?).await,
        Command::Range { ips } => {
            let manager = open_range_manager(config).await?;
            let resolutions = manager
                .resolve_all(&ips)
                .await
                .context("Range cache failure")?;
            if config.json_output {
                println!("{}", format_resolutions_json(&resolutions)?);
            } else {
                println!("{}", format_resolutions(&resolutions));
            }
            Ok(())
        }
        Command::Cache(CacheCommand::List) => {
            let ranges = open_range_cache(config).await?.list().await?;
            if config.json_output {
                println!("{}", serde_json::to_string_pretty(&ranges)?);
            } else {
                println!("{}", format_ranges(&ranges));
            }
            Ok(())
        }
        Command::Cache(CacheCommand::Clear) => {
            let removed = open_range_cache(config).await?.clear().await?;
            println!("Removed {} cached range{}", removed, if removed == 1 { "" } else { "s" });
            Ok(())
        }
        Command::Keys(KeysCommand::Show) => {
            println!("{}", format_keys(&load_keys(config)?));
            Ok(())
        }
        Command::Keys(KeysCommand::Set(update)) => {
            let keys = update_keys(config, &update)?;
            println!("{}", format_keys(&keys));
            Ok(())
        }
    }
}

async fn search(config: &Config, query: SearchQuery) -> Result<()> {
    let report = run_search(config, query).await?;
    if config.json_output {
        println!("{}", format_report_json(&report)?);
    } else {
        println!("{}", format_report(&report));
    }
    Ok(())
}
