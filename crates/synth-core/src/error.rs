//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid YAML/JSON for the expected type.
    #[error("Failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Required key absent from the root config.
    #[error("Missing required key '{0}' in config")]
    MissingKey(&'static str),

    /// File parsed but has the wrong top-level structure.
    #[error("Expected {expected} in {path}")]
    UnexpectedShape {
        path: PathBuf,
        expected: &'static str,
    },

    /// Two profiles share a user name.
    #[error("Duplicate user name: {0}")]
    DuplicateUser(String),
}
