//! Error types for phonebook configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseJson {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        source: serde_json::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A source specification could not be understood.
    #[error("invalid source '{spec}': expected 'ldap', 'ldif:<path>' or 'json:<path>'")]
    InvalidSource {
        /// The rejected specification.
        spec: String,
    },

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
