//! File-backed directories held in memory.

use std::{fs, path::Path};

use phonebook_tree::{DirectoryRecord, Query};
use tracing::{debug, info};

use crate::{
    directory::Directory, error::DirectoryError, json::parse_json, ldif::parse_ldif,
};

/// Object class identifying person entries.
const PERSON_CLASS: &str = "inetOrgPerson";

/// A directory answering queries from a fixed set of records.
///
/// Queries are evaluated with `Query::matches`, which follows the directory's
/// case-insensitive matching rules.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    /// All person records.
    records: Vec<DirectoryRecord>,
    /// Human-readable origin for diagnostics.
    origin: String,
}

impl MemoryDirectory {
    /// Creates a directory over the given records.
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self {
            records,
            origin: String::from("memory"),
        }
    }

    /// Loads person entries from an LDIF export.
    ///
    /// Entries whose object classes do not include `inetOrgPerson` are skipped.
    pub fn from_ldif_file(path: &Path) -> Result<Self, DirectoryError> {
        let content = read_file(path)?;
        let entries = parse_ldif(&content).map_err(|e| DirectoryError::ParseLdif {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        let total = entries.len();
        let records: Vec<DirectoryRecord> = entries
            .iter()
            .filter(|entry| entry.has_object_class(PERSON_CLASS))
            .map(|entry| DirectoryRecord::from_attributes(&entry.dn, &entry.attrs))
            .collect();
        info!(
            path = %path.display(),
            entries = total,
            people = records.len(),
            "loaded LDIF export"
        );

        Ok(Self {
            records,
            origin: format!("ldif:{}", path.display()),
        })
    }

    /// Loads records from a JSON export.
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let content = read_file(path)?;
        let records = parse_json(&content).map_err(|source| DirectoryError::ParseJson {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), people = records.len(), "loaded JSON export");

        Ok(Self {
            records,
            origin: format!("json:{}", path.display()),
        })
    }

    /// Returns every record held by this directory.
    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }
}

impl Directory for MemoryDirectory {
    fn search(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        let found: Vec<DirectoryRecord> = self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        debug!(?query, found = found.len(), "memory search");
        Ok(found)
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

/// Reads a whole export file.
fn read_file(path: &Path) -> Result<String, DirectoryError> {
    fs::read_to_string(path).map_err(|source| DirectoryError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
