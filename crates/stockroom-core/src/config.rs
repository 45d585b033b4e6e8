//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/stockroom/config.toml)
//! 3. Environment variables (STOCKROOM_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "STOCKROOM";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for the working inventory and its id watermark
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for backup files (defaults to `<data_dir>/backups`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Log file used when `STOCKROOM_LOG` is set (defaults to `<data_dir>/debug.log`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backup_dir: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (STOCKROOM_DATA_DIR, STOCKROOM_BACKUP_DIR, STOCKROOM_LOG_FILE)
    /// 2. Config file (~/.config/stockroom/config.toml or STOCKROOM_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, reading the file at `config_path` when given
    ///
    /// Used for the CLI `--config` flag, which wins over `STOCKROOM_CONFIG`.
    pub fn load_with_cli_override(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // STOCKROOM_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // STOCKROOM_BACKUP_DIR, empty string clears it
        if let Ok(val) = std::env::var(format!("{}_BACKUP_DIR", ENV_PREFIX)) {
            self.backup_dir = non_empty_path(val);
        }

        // STOCKROOM_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = non_empty_path(val);
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with STOCKROOM_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stockroom")
            .join("config.toml")
    }

    /// Directory backups are written to and restored from
    pub fn backup_dir(&self) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("backups"))
    }

    /// File holding the working inventory between invocations
    pub fn inventory_path(&self) -> PathBuf {
        self.data_dir.join("inventory.json")
    }

    /// File holding the identifier watermark
    pub fn watermark_path(&self) -> PathBuf {
        self.data_dir.join("id_watermark")
    }

    /// Debug log destination
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

fn non_empty_path(val: String) -> Option<PathBuf> {
    if val.is_empty() {
        None
    } else {
        Some(PathBuf::from(val))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockroom")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "STOCKROOM_DATA_DIR",
        "STOCKROOM_BACKUP_DIR",
        "STOCKROOM_LOG_FILE",
        "STOCKROOM_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.backup_dir.is_none());
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("stockroom"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/stockroom"),
            backup_dir: None,
            log_file: None,
        };

        assert_eq!(config.inventory_path(), PathBuf::from("/data/stockroom/inventory.json"));
        assert_eq!(config.watermark_path(), PathBuf::from("/data/stockroom/id_watermark"));
        assert_eq!(config.backup_dir(), PathBuf::from("/data/stockroom/backups"));
        assert_eq!(config.log_path(), PathBuf::from("/data/stockroom/debug.log"));
    }

    #[test]
    fn test_explicit_backup_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data/stockroom"),
            backup_dir: Some(PathBuf::from("/mnt/usb/backups")),
            log_file: Some(PathBuf::from("/tmp/stockroom.log")),
        };

        assert_eq!(config.backup_dir(), PathBuf::from("/mnt/usb/backups"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/stockroom.log"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STOCKROOM_DATA_DIR", "/tmp/stockroom-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/stockroom-test"));
    }

    #[test]
    fn test_env_override_backup_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("STOCKROOM_BACKUP_DIR", "/srv/backups");
        config.apply_env_overrides();
        assert_eq!(config.backup_dir, Some(PathBuf::from("/srv/backups")));

        // Empty string clears it
        env::set_var("STOCKROOM_BACKUP_DIR", "");
        config.apply_env_overrides();
        assert!(config.backup_dir.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/stockroom"),
            backup_dir: Some(PathBuf::from("/data/backups")),
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("backup_dir"));
        assert!(!toml_str.contains("log_file"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            log_file = "/custom/stockroom.log"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.log_file, Some(PathBuf::from("/custom/stockroom.log")));
        assert_eq!(config.backup_dir(), PathBuf::from("/custom/data/backups"));
    }

    #[test]
    fn test_env_beats_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("STOCKROOM_DATA_DIR", "/from/env");
        let config = Config::load_from_str(r#"data_dir = "/from/file""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("conf").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            backup_dir: None,
            log_file: None,
        };
        config.save_to_path(&config_path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&config_path)).unwrap();
        assert_eq!(loaded, config);
        // Loading creates the data directory
        assert!(config.data_dir.is_dir());
    }

    #[test]
    fn test_config_file_path_env_override() {
        let _guard = EnvGuard::new(ENV_VARS);

        assert!(Config::config_file_path().ends_with("stockroom/config.toml"));

        env::set_var("STOCKROOM_CONFIG", "/etc/stockroom.toml");
        assert_eq!(Config::config_file_path(), PathBuf::from("/etc/stockroom.toml"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();

        env::set_var("STOCKROOM_DATA_DIR", temp_dir.path().join("data"));
        let config = Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap();
        // Should return defaults when file doesn't exist
        assert!(config.backup_dir.is_none());
        assert!(config.log_file.is_none());
    }
}
