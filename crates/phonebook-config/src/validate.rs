//! Configuration validation and diagnostics.

use std::{fmt, path::PathBuf};

use crate::{Config, Source};

/// A non-fatal problem found while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A discovered config file was skipped because it could not be used.
    SkippedFile {
        /// Path of the skipped file.
        path: PathBuf,
        /// Why it was skipped.
        reason: String,
    },
    /// No configuration file was found; built-in defaults are in effect.
    UsingDefaults,
    /// The LDAP source is selected but no server address is configured.
    MissingServer,
    /// The LDAP source is selected but no base DN is configured.
    MissingBaseDn,
    /// A file source points at a file that does not exist.
    SourceFileMissing {
        /// The missing file.
        path: PathBuf,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedFile { path, reason } => {
                write!(f, "skipped config file {}: {reason}", path.display())
            }
            Self::UsingDefaults => f.write_str("no configuration file found, using defaults"),
            Self::MissingServer => f.write_str("ldap_server is empty"),
            Self::MissingBaseDn => f.write_str("base_dn is empty"),
            Self::SourceFileMissing { path } => {
                write!(f, "source file does not exist: {}", path.display())
            }
        }
    }
}

/// Checks a configuration for problems that would make directory access fail.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    match &config.source {
        Source::Ldap => {
            if config.ldap_server.trim().is_empty() {
                warnings.push(ConfigWarning::MissingServer);
            }
            if config.base_dn.trim().is_empty() {
                warnings.push(ConfigWarning::MissingBaseDn);
            }
        }
        Source::Ldif(path) | Source::Json(path) => {
            if !path.is_file() {
                warnings.push(ConfigWarning::SourceFileMissing { path: path.clone() });
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn test_empty_server_and_base() {
        let config = Config {
            ldap_server: " ".into(),
            base_dn: String::new(),
            ..Config::default()
        };
        assert_eq!(
            validate_config(&config),
            vec![ConfigWarning::MissingServer, ConfigWarning::MissingBaseDn]
        );
    }

    #[test]
    fn test_missing_source_file() {
        let config = Config {
            source: Source::Json(PathBuf::from("/nonexistent/people.json")),
            ..Config::default()
        };
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("/nonexistent/people.json"));
    }
}
