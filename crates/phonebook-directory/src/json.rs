//! JSON directory exports.
//!
//! A JSON export is an array of attribute bags. Each value may be a single string or a
//! list of strings; the `dn` attribute names the entry.
//!
//! ```json
//! [
//!   {"dn": "uid=ann,dc=mail,dc=local", "cn": "Ann Archer", "o": "Acme, Sales"},
//!   {"dn": "uid=bob,dc=mail,dc=local", "cn": ["Bob Brown"], "mail": "bob@acme.example"}
//! ]
//! ```

use std::collections::HashMap;

use phonebook_tree::DirectoryRecord;
use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

/// Top-level JSON document.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct JsonDocument {
    /// Attribute bags in file order.
    #[serde_as(as = "Vec<HashMap<_, OneOrMany<_>>>")]
    entries: Vec<HashMap<String, Vec<String>>>,
}

/// Parses a JSON export into records.
///
/// Entries without a `dn` get an empty one. Entries are not filtered by object class:
/// a JSON export is expected to hold people only.
pub fn parse_json(input: &str) -> Result<Vec<DirectoryRecord>, serde_json::Error> {
    let document: JsonDocument = serde_json::from_str(input)?;
    Ok(document
        .entries
        .into_iter()
        .map(|mut attrs| {
            let dn = attrs
                .remove("dn")
                .and_then(|values| values.into_iter().next())
                .unwrap_or_default();
            DirectoryRecord::from_attributes(&dn, &attrs)
        })
        .collect())
}
