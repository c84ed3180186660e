//! Global calgrid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalGridError, CalGridResult};
use crate::event::EventCategory;
use crate::search::DEFAULT_DEBOUNCE;

static DEFAULT_DATA_DIR: &str = "~/.calgrid";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

/// Configuration at ~/.config/calgrid/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CalGridConfig {
    /// Where stored events live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Search debounce for keystroke-driven front ends
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Category preselected for new events
    #[serde(default)]
    pub default_category: EventCategory,
}

impl Default for CalGridConfig {
    fn default() -> Self {
        CalGridConfig {
            data_dir: default_data_dir(),
            search_debounce_ms: default_search_debounce_ms(),
            default_category: EventCategory::default(),
        }
    }
}

impl CalGridConfig {
    pub fn config_path() -> CalGridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalGridError::Config("Could not determine config directory".into()))?
            .join("calgrid");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first run.
    pub fn load() -> CalGridResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> CalGridResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .build()
            .map_err(|e| CalGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalGridError::Config(e.to_string()))
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn save(&self, path: &Path) -> CalGridResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalGridError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalGridResult<()> {
        let contents = format!(
            "\
# calgrid configuration

# Where your events are stored:
# data_dir = \"{}\"

# Quiet period (milliseconds) before a typed search is applied.
# Only front ends that search as you type use it; the calgrid prompts
# submit whole queries and apply them at once:
# search_debounce_ms = {}

# Category for new events (Work, Personal or Important):
# default_category = \"Work\"
",
            DEFAULT_DATA_DIR,
            default_search_debounce_ms()
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalGridError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalGridError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        CalGridConfig::create_default_config(&path).unwrap();
        let config = CalGridConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("~/.calgrid"));
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.default_category, EventCategory::Work);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Only front ends that search as you type use it"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalGridConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.search_debounce_ms, 500);
    }

    #[test]
    fn test_saved_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = CalGridConfig {
            data_dir: dir.path().join("events"),
            search_debounce_ms: 250,
            default_category: EventCategory::Personal,
        };
        config.save(&path).unwrap();

        let loaded = CalGridConfig::load_from(&path).unwrap();
        assert_eq!(loaded.data_path(), dir.path().join("events"));
        assert_eq!(loaded.search_debounce_ms, 250);
        assert_eq!(loaded.default_category, EventCategory::Personal);
    }

    #[test]
    fn test_absolute_data_path_is_unchanged() {
        let config = CalGridConfig {
            data_dir: PathBuf::from("/var/lib/calgrid"),
            ..CalGridConfig::default()
        };
        assert_eq!(config.data_path(), PathBuf::from("/var/lib/calgrid"));
    }
}
