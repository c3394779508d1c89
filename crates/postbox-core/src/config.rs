//! Configuration management for postbox.
//!
//! Loads configuration from ${POSTBOX_HOME}/config.toml with sensible defaults.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What the mediator does when an effect cannot reach its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WiringPolicy {
    /// Abort the dispatch and return the wiring error (default).
    #[default]
    Strict,
    /// Log the wiring error and keep applying the remaining effects.
    Lenient,
}

impl WiringPolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, WiringPolicy::Strict)
    }
}

impl fmt::Display for WiringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WiringPolicy::Strict => "strict",
            WiringPolicy::Lenient => "lenient",
        })
    }
}

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for postbox configuration and data directories.
    //!
    //! `POSTBOX_HOME` resolution order:
    //! 1. `POSTBOX_HOME` environment variable (if set)
    //! 2. ~/.config/postbox (default)
    //! 3. ./.postbox when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the postbox home directory.
    pub fn postbox_home() -> PathBuf {
        if let Ok(home) = std::env::var("POSTBOX_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".postbox"),
            |h| h.join(".config").join("postbox"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        postbox_home().join("config.toml")
    }

    /// Returns the directory rolling log files are written to.
    pub fn logs_dir() -> PathBuf {
        postbox_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the messaging server (optional, see `api::resolve_base_url`)
    pub base_url: Option<String>,

    /// Timeout for workflow round trips in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Milliseconds the notification banner stays visible
    pub notification_hide_ms: u64,

    /// Policy for effects that target missing components
    pub wiring: WiringPolicy,

    /// Default log filter directive
    pub log_level: Option<String>,

    /// Log to a rolling file under `POSTBOX_HOME/logs` instead of stderr
    pub log_to_file: bool,
}

impl Config {
    const DEFAULT_NOTIFICATION_HIDE_MS: u64 = 3000;
    /// Default is disabled
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the workflow timeout, or None if disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Returns how long a notification stays on screen.
    pub fn notification_hide(&self) -> Duration {
        Duration::from_millis(self.notification_hide_ms)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            notification_hide_ms: Self::DEFAULT_NOTIFICATION_HIDE_MS,
            wiring: WiringPolicy::default(),
            log_level: None,
            log_to_file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.notification_hide_ms, 3000);
        assert!(config.wiring.is_strict());
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "wiring = \"lenient\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.wiring, WiringPolicy::Lenient);
        assert_eq!(config.request_timeout_secs, 0);
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "wiring = \"sloppy\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("notification_hide_ms = 3000"));

        // The template itself must parse back to the defaults.
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.notification_hide_ms, 3000);
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:5000"));
        assert_eq!(config.wiring, WiringPolicy::Strict);
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_wiring_policy_display_matches_config_value() {
        for policy in [WiringPolicy::Strict, WiringPolicy::Lenient] {
            let parsed: Config = toml::from_str(&format!("wiring = \"{policy}\"")).unwrap();
            assert_eq!(parsed.wiring, policy);
        }
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);

        let config = Config {
            request_timeout_secs: 5,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }
}
