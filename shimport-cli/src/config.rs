//! Configuration file support for shimport.
//!
//! Configuration is loaded from multiple sources with the following priority (highest first):
//! 1. Command-line arguments
//! 2. `--config <PATH>` file
//! 3. Local config file (./shimport.toml)
//! 4. Global config file (~/.config/shimport/config.toml)
//!
//! The override environment variables themselves are read by the library on
//! every resolution; the config only chooses their names.

use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use shimport::MatchCriteria;
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults for generic port resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Substring matched against port metadata.
    #[serde(rename = "match")]
    pub pattern: Option<String>,
    /// USB Vendor ID.
    pub vid: Option<u16>,
    /// USB Product ID.
    pub pid: Option<u16>,
    /// Override variable name (default: PYSHIMMER_PORT).
    pub env_var: Option<String>,
}

impl SerialConfig {
    /// Match criteria described by this section.
    pub fn criteria(&self) -> MatchCriteria {
        MatchCriteria {
            pattern: self.pattern.clone(),
            vendor_id: self.vid,
            product_id: self.pid,
        }
    }
}

/// Defaults for Bluetooth port resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BluetoothConfig {
    /// Override variable name (default: PYSHIMMER_BT_PORT).
    pub env_var: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generic resolution defaults.
    #[serde(default)]
    pub serial: SerialConfig,
    /// Bluetooth resolution defaults.
    #[serde(default)]
    pub bluetooth: BluetoothConfig,
}

impl Config {
    /// Load configuration from all available sources.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global_config) = Self::load_from_file(&global_path) {
                debug!("Loaded global config from {}", global_path.display());
                config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        if let Some(local_config) = Self::load_from_file(Path::new("shimport.toml")) {
            debug!("Loaded local config from shimport.toml");
            config.merge(local_config);
        }

        config
    }

    /// Load configuration from a specific file path (--config flag).
    pub fn load_from_path(path: &Path) -> Self {
        if let Some(config) = Self::load_from_file(path) {
            debug!("Loaded config from {}", path.display());
            config
        } else {
            warn!(
                "Could not load config from {}, using defaults",
                path.display()
            );
            Self::default()
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Failed to parse config file {}: {}", path.display(), e);
                    None
                },
            },
            Err(e) => {
                warn!("Failed to read config file {}: {}", path.display(), e);
                None
            },
        }
    }

    /// Get the global configuration directory.
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shimport").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the global configuration file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Merge another config into this one.
    fn merge(&mut self, other: Self) {
        if other.serial.pattern.is_some() {
            self.serial.pattern = other.serial.pattern;
        }
        if other.serial.vid.is_some() {
            self.serial.vid = other.serial.vid;
        }
        if other.serial.pid.is_some() {
            self.serial.pid = other.serial.pid;
        }
        if other.serial.env_var.is_some() {
            self.serial.env_var = other.serial.env_var;
        }
        if other.bluetooth.env_var.is_some() {
            self.bluetooth.env_var = other.bluetooth.env_var;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Default values ----

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.serial.pattern.is_none());
        assert!(config.serial.vid.is_none());
        assert!(config.serial.pid.is_none());
        assert!(config.serial.env_var.is_none());
        assert!(config.bluetooth.env_var.is_none());
        assert!(config.serial.criteria().is_empty());
    }

    // ---- Config merge ----

    #[test]
    fn test_config_merge_overrides() {
        let mut base = Config::default();
        base.serial.pattern = Some("ftdi".to_string());
        base.serial.vid = Some(0x0403);

        let mut other = Config::default();
        other.serial.pattern = Some("cp210".to_string());
        other.bluetooth.env_var = Some("SENSOR_PORT".to_string());

        base.merge(other);

        assert_eq!(base.serial.pattern.as_deref(), Some("cp210"));
        assert_eq!(base.serial.vid, Some(0x0403));
        assert_eq!(base.bluetooth.env_var.as_deref(), Some("SENSOR_PORT"));
    }

    #[test]
    fn test_config_merge_does_not_overwrite_with_none() {
        let mut base = Config::default();
        base.serial.env_var = Some("DOCK_PORT".to_string());
        base.serial.pid = Some(0xEA60);

        base.merge(Config::default());

        assert_eq!(base.serial.env_var.as_deref(), Some("DOCK_PORT"));
        assert_eq!(base.serial.pid, Some(0xEA60));
    }

    // ---- TOML deserialization ----

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[serial]
match = "CP210"
vid = 0x10C4
pid = 0xEA60
env_var = "DOCK_PORT"

[bluetooth]
env_var = "SENSOR_PORT"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.serial.pattern.as_deref(), Some("CP210"));
        assert_eq!(config.serial.vid, Some(0x10C4));
        assert_eq!(config.serial.pid, Some(0xEA60));
        assert_eq!(config.serial.env_var.as_deref(), Some("DOCK_PORT"));
        assert_eq!(config.bluetooth.env_var.as_deref(), Some("SENSOR_PORT"));

        let criteria = config.serial.criteria();
        assert_eq!(
            criteria,
            MatchCriteria::matching("CP210")
                .vendor_id(0x10C4)
                .product_id(0xEA60)
        );
    }

    #[test]
    fn test_config_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.serial.pattern.is_none());
        assert!(config.bluetooth.env_var.is_none());
    }

    #[test]
    fn test_config_rejects_out_of_range_vid() {
        let result: Result<Config, _> = toml::from_str("[serial]\nvid = 70000\n");
        assert!(result.is_err());
    }

    // ---- load_from_path with tempfile ----

    #[test]
    fn test_load_from_path_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shimport.toml");
        fs::write(&path, "[serial]\nmatch = \"dock\"\n").unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.serial.pattern.as_deref(), Some("dock"));
    }

    #[test]
    fn test_load_from_path_malformed_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[serial\nmatch = ").unwrap();

        let config = Config::load_from_path(&path);
        assert!(config.serial.pattern.is_none());
    }

    #[test]
    fn test_load_from_path_nonexistent() {
        let config = Config::load_from_path(Path::new("/nonexistent/path/config.toml"));
        assert!(config.serial.pattern.is_none());
    }

    // ---- global_config_path ----

    #[test]
    fn test_global_config_path_shape() {
        if let Some(p) = Config::global_config_path() {
            assert!(p.to_str().unwrap().contains("shimport"));
            assert!(p.to_str().unwrap().ends_with("config.toml"));
        }
    }
}
