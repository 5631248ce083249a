use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE_NAME: &str = "settings.star";
pub const DEFAULT_BUILD_FILE_NAME: &str = "build.star";
pub const DEFAULT_PROPERTIES_FILE_NAME: &str = "plumb.properties";

/// Names of the files plumb looks for, and front-end defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    pub settings_file_name: String,
    pub build_file_name: String,
    pub properties_file_name: String,
    /// Used when neither `--search-upwards` nor `--no-search-upwards` is given
    pub search_upwards: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings_file_name: DEFAULT_SETTINGS_FILE_NAME.to_string(),
            build_file_name: DEFAULT_BUILD_FILE_NAME.to_string(),
            properties_file_name: DEFAULT_PROPERTIES_FILE_NAME.to_string(),
            search_upwards: true,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Nearest `.plumb.json` or `plumb.json` at or above `start_path`
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(".plumb.json");
            if config_path.is_file() {
                return Some(config_path);
            }

            let config_path = current.join("plumb.json");
            if config_path.is_file() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    /// Load the nearest configuration, or the defaults when there is none
    pub fn load(start_path: &Path) -> Result<Self> {
        match Self::find_config_file(start_path) {
            Some(path) => {
                tracing::debug!("Loading config from {:?}", path);
                Self::load_from_file(&path)
            }
            None => {
                tracing::debug!("No config file found from {:?}, using defaults", start_path);
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("settings_file_name", &self.settings_file_name),
            ("build_file_name", &self.build_file_name),
            ("properties_file_name", &self.properties_file_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigError(format!("'{field}' must not be empty")));
            }
        }
        Ok(())
    }
}
