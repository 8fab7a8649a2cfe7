use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Startup failures of the costory binary
#[derive(Debug, Error)]
pub enum CostoryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read story file {}: {source}", path.display())]
    StoryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker thread could not be spawned
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
