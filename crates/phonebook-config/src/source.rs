//! Directory source specifications.
//!
//! A source is written as `ldap`, `ldif:<path>` or `json:<path>`. File paths may be
//! absolute, tilde-prefixed, or relative to the directory of the configuration file that
//! named them.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{ConfigError, discovery::home_dir};

/// Where directory records come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Source {
    /// A live LDAP server.
    #[default]
    Ldap,
    /// An LDIF export on disk.
    Ldif(PathBuf),
    /// A JSON array of attribute maps on disk.
    Json(PathBuf),
}

impl Source {
    /// Parses a source specification, resolving relative paths against `base_dir`.
    pub fn parse(spec: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidSource {
            spec: spec.to_string(),
        };

        let spec_trimmed = spec.trim();
        if spec_trimmed.eq_ignore_ascii_case("ldap") {
            return Ok(Self::Ldap);
        }

        let (kind, path) = spec_trimmed.split_once(':').ok_or_else(invalid)?;
        let path = path.trim();
        if path.is_empty() {
            return Err(invalid());
        }
        let path = resolve_file_path(path, base_dir)?;

        match kind.trim().to_ascii_lowercase().as_str() {
            "ldif" => Ok(Self::Ldif(path)),
            "json" => Ok(Self::Json(path)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ldap => f.write_str("ldap"),
            Self::Ldif(path) => write!(f, "ldif:{}", path.display()),
            Self::Json(path) => write!(f, "json:{}", path.display()),
        }
    }
}

/// Resolves a file path from a source specification.
///
/// - `~` and `~/...` expand to the home directory
/// - relative paths are joined onto `base_dir` when one is given
/// - absolute paths are returned as-is
///
/// The file is not required to exist.
fn resolve_file_path(path: &str, base_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let expanded = if path == "~" {
        home_dir().ok_or(ConfigError::NoHomeDirectory)?
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir().ok_or(ConfigError::NoHomeDirectory)?.join(rest)
    } else {
        PathBuf::from(path)
    };

    Ok(match base_dir {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ldap() {
        assert_eq!(Source::parse("ldap", None).unwrap(), Source::Ldap);
        assert_eq!(Source::parse(" LDAP ", None).unwrap(), Source::Ldap);
    }

    #[test]
    fn test_parse_file_sources() {
        assert_eq!(
            Source::parse("ldif:/srv/export.ldif", None).unwrap(),
            Source::Ldif(PathBuf::from("/srv/export.ldif"))
        );
        assert_eq!(
            Source::parse("json:people.json", Some(Path::new("/etc/ldap-phonebook"))).unwrap(),
            Source::Json(PathBuf::from("/etc/ldap-phonebook/people.json"))
        );
        assert_eq!(
            Source::parse("json:people.json", None).unwrap(),
            Source::Json(PathBuf::from("people.json"))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for spec in ["", "ldif:", "ldif", "csv:/tmp/x.csv", "ldaps"] {
            let err = Source::parse(spec, None).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidSource { .. }), "{spec}");
        }
    }

    #[test]
    fn test_display_roundtrips() {
        let source = Source::Ldif(PathBuf::from("/srv/a.ldif"));
        assert_eq!(source.to_string(), "ldif:/srv/a.ldif");
        assert_eq!(Source::parse(&source.to_string(), None).unwrap(), source);
    }
}
