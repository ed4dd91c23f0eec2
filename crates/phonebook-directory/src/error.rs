//! Error types for directory access.

use std::{io, path::PathBuf};

use ldap3::LdapError;
use thiserror::Error;

/// Errors that can occur while querying a directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Could not connect to the directory server.
    #[error("failed to connect to LDAP server {server}: {source}")]
    Connect {
        /// Server URL.
        server: String,
        /// Underlying LDAP error.
        source: LdapError,
    },

    /// The server rejected the bind credentials.
    #[error("LDAP authentication failed for {dn}: {source}")]
    Bind {
        /// Bind DN.
        dn: String,
        /// Underlying LDAP error.
        source: LdapError,
    },

    /// The search operation failed.
    #[error("LDAP search failed: {source}")]
    Search {
        /// Underlying LDAP error.
        source: LdapError,
    },

    /// Failed to read a directory export file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An LDIF export is malformed.
    #[error("{path}:{line}: {message}")]
    ParseLdif {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A JSON export is malformed.
    #[error("failed to parse {path}: {source}")]
    ParseJson {
        /// File being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A background request could not deliver its result.
    #[error("directory worker stopped before answering")]
    WorkerGone,
}
