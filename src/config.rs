//! Configuration loading
//!
//! Reads `config.toml` from the platform config directory
//! (`~/.config/costory/config.toml` on Linux). A missing default file is not
//! an error; a missing file passed explicitly is.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

mod types;

pub use types::{
    Config, DEFAULT_BASE_URL, DEFAULT_EXPORT_TITLE, ExportConfig, ServerConfig,
};

/// Errors reading or parsing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("costory").join("config.toml"))
}

/// Load configuration
///
/// With `explicit` set, that file must exist. Otherwise the default location
/// is tried and defaults are used when nothing is there.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

/// Parse a config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
