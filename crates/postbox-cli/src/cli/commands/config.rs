//! Config command handlers.

use anyhow::{Context, Result};
use postbox_core::api::ApiClient;
use postbox_core::config::{Config, paths};

pub fn path() {
    println!("{}", paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    let written = Config::load_from(&config_path).context("reload written config")?;
    println!("Created config at {}", config_path.display());
    println!("wiring = {}", written.wiring);
    Ok(())
}

/// Prints the settings a page session would run with, flags applied.
pub fn show(config: &Config, api: &ApiClient) {
    println!("base_url = {}", api.base_url());
    match config.request_timeout() {
        Some(limit) => println!("request_timeout = {}s", limit.as_secs()),
        None => println!("request_timeout = none"),
    }
    println!("notification_hide_ms = {}", config.notification_hide_ms);
    println!("wiring = {}", config.wiring);
    println!(
        "log_level = {}",
        config.log_level.as_deref().unwrap_or("warn")
    );
}
