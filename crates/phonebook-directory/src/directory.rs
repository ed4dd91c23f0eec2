//! The directory abstraction and source selection.

use std::sync::Arc;

use phonebook_config::{Config, Source};
use phonebook_tree::{DirectoryRecord, Query};
use tracing::debug;

use crate::{error::DirectoryError, ldap::LdapDirectory, memory::MemoryDirectory};

/// A source of person records that can answer typed queries.
///
/// Implementations are shared with background workers, so they must be thread-safe.
pub trait Directory: Send + Sync {
    /// Returns every person matching `query`, in no particular order.
    fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError>;

    /// Describes where records come from, for diagnostics.
    fn describe(&self) -> String;
}

impl<D: Directory + ?Sized> Directory for Box<D> {
    fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        (**self).search(query)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<D: Directory + ?Sized> Directory for Arc<D> {
    fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        (**self).search(query)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Opens the directory named by `source`, or by the configuration when `None`.
///
/// File-backed sources are read eagerly; an LDAP directory connects on each search.
pub fn open_directory(
    config: &Config,
    source: Option<&Source>,
) -> Result<Box<dyn Directory>, DirectoryError> {
    let source = source.unwrap_or(&config.source);
    debug!(%source, "opening directory");
    Ok(match source {
        Source::Ldap => Box::new(LdapDirectory::from_config(config)),
        Source::Ldif(path) => Box::new(MemoryDirectory::from_ldif_file(path)?),
        Source::Json(path) => Box::new(MemoryDirectory::from_json_file(path)?),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_open_ldap_does_not_connect() {
        let config = Config {
            ldap_server: "directory.invalid:389".into(),
            ..Config::default()
        };
        let dir = open_directory(&config, None).unwrap();
        assert!(dir.describe().contains("ldap://directory.invalid:389"));
    }

    #[test]
    fn test_override_wins_over_config() {
        let config = Config::default();
        let missing = Source::Json(PathBuf::from("/nonexistent/people.json"));
        let err = open_directory(&config, Some(&missing)).err().unwrap();
        assert!(matches!(err, DirectoryError::ReadFile { .. }));
    }
}
