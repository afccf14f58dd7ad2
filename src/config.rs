use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "candy";
const CONFIG_FILE: &str = "config.json";

/// What [`Candy::add_file`](crate::Candy::add_file) does when the destination
/// file already exists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileWritePolicy {
    /// Replace the file's contents.
    #[default]
    Overwrite,
    /// Leave the existing file alone and only reference it.
    KeepExisting,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CandyConfig {
    /// Top-level group paths that are never source groups.
    pub excluded_group_names: Vec<String>,
    /// Group path suffixes that mark test groups.
    pub excluded_group_suffixes: Vec<String>,
    pub file_write_policy: FileWritePolicy,
    /// A manifest location whose last component contains this marker is a
    /// container; the project root is then its parent directory.
    pub container_marker: String,
}

impl Default for CandyConfig {
    fn default() -> Self {
        Self {
            excluded_group_names: vec!["Products".into(), "Frameworks".into()],
            excluded_group_suffixes: vec!["Tests".into(), "UITests".into()],
            file_write_policy: FileWritePolicy::Overwrite,
            container_marker: "xcodeproj".into(),
        }
    }
}

impl CandyConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if the file doesn't exist, or if the config
    /// directory can't be determined or the file can't be read or parsed.
    pub fn load() -> Self {
        match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration to the user's config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Whether a top-level group path is excluded from source group discovery.
    pub fn is_excluded_group(&self, path: &str) -> bool {
        self.excluded_group_names.iter().any(|name| name == path)
            || self
                .excluded_group_suffixes
                .iter()
                .any(|suffix| path.ends_with(suffix.as_str()))
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let config = CandyConfig::default();
        assert!(config.is_excluded_group("Products"));
        assert!(config.is_excluded_group("Frameworks"));
        assert!(config.is_excluded_group("DemoTests"));
        assert!(config.is_excluded_group("DemoUITests"));
        assert!(!config.is_excluded_group("Demo"));
        assert!(!config.is_excluded_group("products"));
        assert!(!config.is_excluded_group("Testsuite"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CandyConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, CandyConfig::default());
    }

    #[test]
    fn test_save_and_load_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = CandyConfig {
            file_write_policy: FileWritePolicy::KeepExisting,
            ..CandyConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(CandyConfig::load_from(&path).unwrap(), config);

        fs::write(&path, r#"{"file_write_policy":"keep_existing"}"#).unwrap();
        let partial = CandyConfig::load_from(&path).unwrap();
        assert_eq!(partial.file_write_policy, FileWritePolicy::KeepExisting);
        assert_eq!(partial.container_marker, "xcodeproj");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(CandyConfig::load_from(&path).is_err());
    }
}
