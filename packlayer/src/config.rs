//! Configuration file handling.
//!
//! Settings live in an INI file, by default at
//! `<config dir>/packlayer/config.ini`:
//!
//! ```ini
//! [packs]
//! global_dir = /home/me/.packlayer/globalresources
//! pack_id = packlayer
//! base_priority = false
//!
//! [logging]
//! level = info
//! directory = /home/me/.packlayer/logs
//! ```
//!
//! Missing files and missing keys fall back to defaults.

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Default identifier of the global pack.
pub const DEFAULT_PACK_ID: &str = "packlayer";

/// Default tracing filter level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// A key holds a value of the wrong shape.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings for pack discovery and the global pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSettings {
    /// Folder scanned for packs.
    pub global_dir: PathBuf,

    /// Identifier of the global pack; the base placeholder is `<id>_global`.
    pub pack_id: String,

    /// Whether the base placeholder wins ties over discovered packs.
    pub base_priority: bool,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            global_dir: default_global_dir(),
            pack_id: DEFAULT_PACK_ID.to_string(),
            base_priority: false,
        }
    }
}

impl PackSettings {
    /// Create settings for the given folder, other values default.
    pub fn new(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir: global_dir.into(),
            ..Default::default()
        }
    }

    /// Set whether the base placeholder wins ties.
    pub fn with_base_priority(mut self, base_priority: bool) -> Self {
        self.base_priority = base_priority;
        self
    }

    /// Set the pack identifier.
    pub fn with_pack_id(mut self, pack_id: impl Into<String>) -> Self {
        self.pack_id = pack_id.into();
        self
    }
}

/// Settings for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`, `packlayer=debug`).
    pub level: String,

    /// Directory for log files; `None` logs to stderr only.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            directory: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// `[packs]` section.
    pub packs: PackSettings,

    /// `[logging]` section.
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        config_file_path()
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, returning defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(e) => ConfigError::Io(e),
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        Self::from_ini(&ini)
    }

    /// Build from parsed INI contents.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("packs")) {
            if let Some(dir) = section.get("global_dir") {
                config.packs.global_dir = expand_home(dir);
            }
            if let Some(id) = section.get("pack_id") {
                if id.trim().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "packs.pack_id".to_string(),
                        value: id.to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }
                config.packs.pack_id = id.trim().to_string();
            }
            if let Some(value) = section.get("base_priority") {
                config.packs.base_priority = parse_bool("packs.base_priority", value)?;
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = section.get("level") {
                config.logging.level = level.trim().to_string();
            }
            if let Some(dir) = section.get("directory") {
                config.logging.directory = (!dir.trim().is_empty()).then(|| expand_home(dir));
            }
        }

        Ok(config)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("packs"))
            .set("global_dir", self.packs.global_dir.to_string_lossy())
            .set("pack_id", self.packs.pack_id.as_str())
            .set("base_priority", self.packs.base_priority.to_string());

        let mut logging = ini.with_section(Some("logging"));
        logging.set("level", self.logging.level.as_str());
        if let Some(dir) = &self.logging.directory {
            logging.set("directory", dir.to_string_lossy());
        }

        ini.write_to_file(path)?;
        Ok(())
    }
}

/// Default configuration file location.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("packlayer")
        .join("config.ini")
}

/// Default folder scanned for packs.
pub fn default_global_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".packlayer")
        .join("globalresources")
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn expand_home(value: &str) -> PathBuf {
    let value = value.trim();
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(value)),
        None => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("none.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert!(!config.packs.base_priority);
        assert_eq!(config.packs.pack_id, DEFAULT_PACK_ID);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_parse_all_keys() {
        let ini = Ini::load_from_str(
            "[packs]\n\
             global_dir = /srv/packs\n\
             pack_id = mypacks\n\
             base_priority = yes\n\
             [logging]\n\
             level = packlayer=debug\n\
             directory = /var/log/packlayer\n",
        )
        .unwrap();

        let config = ConfigFile::from_ini(&ini).unwrap();
        assert_eq!(config.packs.global_dir, PathBuf::from("/srv/packs"));
        assert_eq!(config.packs.pack_id, "mypacks");
        assert!(config.packs.base_priority);
        assert_eq!(config.logging.level, "packlayer=debug");
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/packlayer"))
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let ini = Ini::load_from_str("[logging]\nlevel = warn\n").unwrap();
        let config = ConfigFile::from_ini(&ini).unwrap();
        assert_eq!(config.packs, PackSettings::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_bool() {
        let ini = Ini::load_from_str("[packs]\nbase_priority = maybe\n").unwrap();
        let err = ConfigFile::from_ini(&ini).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "packs.base_priority"));
    }

    #[test]
    fn test_empty_pack_id_rejected() {
        let ini = Ini::load_from_str("[packs]\npack_id =\n").unwrap();
        assert!(ConfigFile::from_ini(&ini).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let config = ConfigFile {
            packs: PackSettings::new(temp.path().join("packs"))
                .with_base_priority(true)
                .with_pack_id("custom"),
            logging: LoggingSettings {
                level: "debug".to_string(),
                directory: Some(temp.path().join("logs")),
            },
        };
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/packs"), home.join("packs"));
        }
    }

    #[test]
    fn test_default_paths() {
        assert!(ConfigFile::default_path().ends_with("packlayer/config.ini"));
        assert!(default_global_dir().ends_with(".packlayer/globalresources"));
    }
}
