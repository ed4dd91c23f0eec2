//! Configuration system for the LDAP phonebook.
//!
//! The phonebook reads a JSON file named `ldap-phonebook.json`. Candidate locations are
//! tried in precedence order (next to the executable, `/etc/ldap-phonebook/`,
//! `~/.config/ldap-phonebook/`) and the first file that can be read and parsed wins.
//! Files that fail are skipped with a warning; when none is usable, built-in defaults
//! apply.

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;
mod source;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    fs,
    path::{Path, PathBuf},
};

pub use discovery::{
    APP_NAME, CONFIG_FILENAME, SYSTEM_CONFIG_DIR, candidate_paths, discover_config_files,
    user_config_path,
};
pub use error::ConfigError;
pub use parse::{RawConfig, parse_config_file, parse_config_str};
use serde::Serialize;
pub use source::Source;
pub use templates::default_template;
use tracing::{debug, warn};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default display name of the organization tree root.
const DEFAULT_ROOT_NAME: &str = "Organizations and departments";

/// Placeholder printed instead of a non-empty password.
const MASKED_PASSWORD: &str = "********";

/// Fully resolved phonebook configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory server address (`host:port` or an `ldap://` URL).
    pub ldap_server: String,
    /// Bind DN used to authenticate.
    pub bind_dn: String,
    /// Bind password.
    pub bind_password: String,
    /// Search base DN.
    pub base_dn: String,
    /// Single-instance socket path. Kept for file compatibility; not used.
    pub socket_file: String,
    /// Where directory records come from.
    pub source: Source,
    /// Display name of the tree root.
    pub root_name: String,
    /// Network timeout for directory operations; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Whether to escape filter metacharacters in user input.
    pub escape_filters: bool,
    /// File the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
    /// Problems encountered while loading.
    pub warnings: Vec<ConfigWarning>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ldap_server: String::from("abook:389"),
            bind_dn: String::from("dc=mail,dc=local"),
            bind_password: String::new(),
            base_dn: String::from("dc=mail,dc=local"),
            socket_file: String::from("/tmp/ldap-phonebook.sock"),
            source: Source::Ldap,
            root_name: String::from(DEFAULT_ROOT_NAME),
            timeout_secs: None,
            escape_filters: true,
            config_path: None,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the first usable discovered file.
    ///
    /// Never fails: unusable files are recorded in `warnings` and defaults are used when
    /// nothing is found.
    pub fn load() -> Self {
        Self::load_from_files(&discover_config_files())
    }

    /// Loads configuration from the first usable file in `files`.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Self {
        let mut warnings = Vec::new();
        for path in files {
            match Self::load_file(path) {
                Ok(mut config) => {
                    debug!(path = %path.display(), "loaded configuration");
                    warnings.append(&mut config.warnings);
                    config.warnings = warnings;
                    return config;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping config file");
                    warnings.push(ConfigWarning::SkippedFile {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        warnings.push(ConfigWarning::UsingDefaults);
        Self {
            warnings,
            ..Self::default()
        }
    }

    /// Loads configuration from one specific file, failing on any error.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_config_file(path)?;
        let mut config = Self::from_raw(raw, path.parent())?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies defaults to a raw configuration.
    ///
    /// Relative file paths in `source` are resolved against `base_dir`.
    pub fn from_raw(raw: RawConfig, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let source = match raw.source.as_deref() {
            Some(spec) => Source::parse(spec, base_dir)?,
            None => defaults.source,
        };

        Ok(Self {
            ldap_server: raw.ldap_server.unwrap_or(defaults.ldap_server),
            bind_dn: raw.bind_dn.unwrap_or(defaults.bind_dn),
            bind_password: raw.bind_password.unwrap_or(defaults.bind_password),
            base_dn: raw.base_dn.unwrap_or(defaults.base_dn),
            socket_file: raw.socket_file.unwrap_or(defaults.socket_file),
            source,
            root_name: raw.root_name.unwrap_or(defaults.root_name),
            timeout_secs: raw.timeout_secs.or(defaults.timeout_secs),
            escape_filters: raw.escape_filters.unwrap_or(defaults.escape_filters),
            config_path: None,
            warnings: Vec::new(),
        })
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to pretty-printed JSON.
    ///
    /// With `mask_password` set, a non-empty password is replaced by a placeholder.
    pub fn to_json(&self, mask_password: bool) -> String {
        let password = if mask_password && !self.bind_password.is_empty() {
            MASKED_PASSWORD.to_string()
        } else {
            self.bind_password.clone()
        };
        let serializable = SerializableConfig {
            ldap_server: &self.ldap_server,
            bind_dn: &self.bind_dn,
            bind_password: password,
            base_dn: &self.base_dn,
            socket_file: &self.socket_file,
            source: self.source.to_string(),
            root_name: &self.root_name,
            timeout_secs: self.timeout_secs,
            escape_filters: self.escape_filters,
        };
        serde_json::to_string_pretty(&serializable).expect("config serialization should not fail")
    }

    /// Writes the default configuration template to `path`, creating parent directories.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, default_template()).map_err(write_err)
    }
}

/// Internal struct for JSON serialization of the effective settings.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Directory server address.
    ldap_server: &'a str,
    /// Bind DN.
    bind_dn: &'a str,
    /// Bind password, possibly masked.
    bind_password: String,
    /// Search base DN.
    base_dn: &'a str,
    /// Single-instance socket path.
    socket_file: &'a str,
    /// Source specification.
    source: String,
    /// Tree root display name.
    root_name: &'a str,
    /// Network timeout in seconds.
    timeout_secs: Option<u64>,
    /// Filter escaping switch.
    escape_filters: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.ldap_server, "abook:389");
        assert_eq!(config.bind_dn, "dc=mail,dc=local");
        assert!(config.bind_password.is_empty());
        assert_eq!(config.base_dn, "dc=mail,dc=local");
        assert_eq!(config.socket_file, "/tmp/ldap-phonebook.sock");
        assert_eq!(config.source, Source::Ldap);
        assert!(config.escape_filters);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_from_raw_partial() {
        let raw = parse_config_str(
            r#"{"ldap_server": "dir:636", "source": "ldif:export.ldif"}"#,
            Path::new("x.json"),
        )
        .unwrap();
        let config = Config::from_raw(raw, Some(Path::new("/etc/ldap-phonebook"))).unwrap();
        assert_eq!(config.ldap_server, "dir:636");
        assert_eq!(config.base_dn, "dc=mail,dc=local");
        assert_eq!(
            config.source,
            Source::Ldif(PathBuf::from("/etc/ldap-phonebook/export.ldif"))
        );
    }

    #[test]
    fn test_from_raw_invalid_source() {
        let raw = RawConfig {
            source: Some("carrier-pigeon".into()),
            ..RawConfig::default()
        };
        assert!(matches!(
            Config::from_raw(raw, None),
            Err(ConfigError::InvalidSource { .. })
        ));
    }

    #[test]
    fn test_load_from_files_first_usable_wins() {
        let dir = TestDir::new();
        let broken = dir.create_file("a/ldap-phonebook.json", "{ nope");
        let good = dir.create_file("b/ldap-phonebook.json", r#"{"base_dn": "o=good"}"#);
        let later = dir.create_file("c/ldap-phonebook.json", r#"{"base_dn": "o=later"}"#);

        let config = Config::load_from_files(&[broken.clone(), good.clone(), later]);
        assert_eq!(config.base_dn, "o=good");
        assert_eq!(config.config_path.as_deref(), Some(good.as_path()));
        assert_eq!(config.warnings.len(), 1);
        assert!(matches!(
            &config.warnings[0],
            ConfigWarning::SkippedFile { path, .. } if *path == broken
        ));
    }

    #[test]
    fn test_load_from_no_files_uses_defaults() {
        let config = Config::load_from_files(&[]);
        assert_eq!(config.ldap_server, "abook:389");
        assert_eq!(config.warnings, vec![ConfigWarning::UsingDefaults]);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_to_json_masks_password() {
        let config = Config {
            bind_password: "hunter2".into(),
            ..Config::default()
        };
        let masked = config.to_json(true);
        assert!(masked.contains(MASKED_PASSWORD));
        assert!(!masked.contains("hunter2"));
        assert!(config.to_json(false).contains("hunter2"));

        let value: serde_json::Value = serde_json::from_str(&masked).unwrap();
        assert_eq!(value["source"], "ldap");
    }

    #[test]
    fn test_write_default_creates_parents() {
        let dir = TestDir::new();
        let path = dir.path().join("x/y/ldap-phonebook.json");
        Config::write_default(&path).unwrap();
        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.ldap_server, "abook:389");
    }
}
