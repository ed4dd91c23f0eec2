//! Configuration file parsing.
//!
//! Parses individual `ldap-phonebook.json` files into `RawConfig` structures that keep
//! every field optional, so that defaults can be applied in one place.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a JSON file.
///
/// Field names mirror the JSON schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Directory server address (`host:port`).
    pub ldap_server: Option<String>,
    /// Bind DN used to authenticate.
    pub bind_dn: Option<String>,
    /// Bind password.
    pub bind_password: Option<String>,
    /// Search base DN.
    pub base_dn: Option<String>,
    /// Single-instance socket path.
    pub socket_file: Option<String>,
    /// Directory source: `ldap`, `ldif:<path>` or `json:<path>`.
    pub source: Option<String>,
    /// Display name of the tree root.
    pub root_name: Option<String>,
    /// Network timeout in seconds for directory operations.
    pub timeout_secs: Option<u64>,
    /// Whether to escape filter metacharacters in user input.
    pub escape_filters: Option<bool>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a JSON string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_object() {
        let config = parse_config_str("{}", Path::new("test.json")).unwrap();
        assert!(config.ldap_server.is_none());
        assert!(config.source.is_none());
        assert!(config.escape_filters.is_none());
    }

    #[test]
    fn test_parse_legacy_fields() {
        let json = r#"{
            "ldap_server": "ldap.example.org:389",
            "bind_dn": "cn=ro,dc=example,dc=org",
            "bind_password": "secret",
            "base_dn": "dc=example,dc=org",
            "socket_file": "/run/user/1000/pb.sock"
        }"#;
        let config = parse_config_str(json, Path::new("test.json")).unwrap();
        assert_eq!(config.ldap_server.as_deref(), Some("ldap.example.org:389"));
        assert_eq!(config.bind_password.as_deref(), Some("secret"));
        assert_eq!(config.socket_file.as_deref(), Some("/run/user/1000/pb.sock"));
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let config =
            parse_config_str(r#"{"window_width": 1200, "timeout_secs": 5}"#, Path::new("x"))
                .unwrap();
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_parse_error_reports_path() {
        let err = parse_config_str("{not json", Path::new("broken.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseJson { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
