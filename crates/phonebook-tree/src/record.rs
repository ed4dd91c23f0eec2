//! Directory records.
//!
//! A `DirectoryRecord` is the strongly-typed view of one person entry returned by a
//! directory query. Records are populated once at the directory-access boundary from a
//! loosely-typed attribute bag and are never mutated afterwards.

use std::{collections::HashMap, fmt::Write};

use serde::Serialize;

/// Attribute names requested from the directory for person entries.
pub const PERSON_ATTRIBUTES: [&str; 8] = [
    "cn",
    "mail",
    "telephoneNumber",
    "ou",
    "o",
    "title",
    "l",
    "postalAddress",
];

/// One retrieved person entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    /// Distinguished name.
    pub dn: String,
    /// Common name (full name of the person).
    pub cn: String,
    /// Organization, possibly an `"org, department"` composite.
    pub organization: String,
    /// Organizational unit.
    pub unit: String,
    /// Job title.
    pub title: String,
    /// E-mail address.
    pub mail: String,
    /// Telephone number.
    pub telephone_number: String,
    /// Locality (city).
    pub locality: String,
    /// Postal address.
    pub postal_address: String,
}

impl DirectoryRecord {
    /// Builds a record from a raw attribute bag.
    ///
    /// The first value of each known attribute is used. Attribute names are matched
    /// case-insensitively. The organization, unit and postal address values have their
    /// entity-escaped quotes decoded.
    pub fn from_attributes(dn: &str, attrs: &HashMap<String, Vec<String>>) -> Self {
        let first = |name: &str| -> String {
            attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .and_then(|(_, values)| values.first())
                .cloned()
                .unwrap_or_default()
        };

        Self {
            dn: dn.to_string(),
            cn: first("cn"),
            organization: decode_entities(&first("o")),
            unit: decode_entities(&first("ou")),
            title: first("title"),
            mail: first("mail"),
            telephone_number: first("telephoneNumber"),
            locality: first("l"),
            postal_address: decode_entities(&first("postalAddress")),
        }
    }

    /// Splits the organization field on its first comma.
    ///
    /// Returns the trimmed organization name and, if a non-empty remainder exists, the
    /// trimmed department name.
    pub fn organization_parts(&self) -> (&str, Option<&str>) {
        split_organization(&self.organization)
    }

    /// Returns the logical tree path (`org[:dept][:unit]`) locating this record.
    pub fn tree_path(&self) -> String {
        let (org, dept) = self.organization_parts();
        let mut path = org.to_string();
        if let Some(dept) = dept {
            path.push(':');
            path.push_str(dept);
        }
        let unit = self.unit.trim();
        if !unit.is_empty() {
            path.push(':');
            path.push_str(unit);
        }
        path
    }

    /// Renders the multi-line person card.
    pub fn details(&self) -> String {
        let mut out = String::new();
        let rows = [
            ("Name", &self.cn),
            ("Email", &self.mail),
            ("Phone", &self.telephone_number),
            ("Title", &self.title),
            ("Unit", &self.unit),
            ("Organization", &self.organization),
            ("City", &self.locality),
            ("Address", &self.postal_address),
        ];
        for (label, value) in rows {
            // Writing into a String cannot fail.
            let _ignored = writeln!(out, "{label}: {value}");
        }
        out
    }
}

/// Splits a composite organization string into organization and optional department.
pub fn split_organization(value: &str) -> (&str, Option<&str>) {
    match value.split_once(',') {
        Some((org, dept)) => {
            let dept = dept.trim();
            (org.trim(), (!dept.is_empty()).then_some(dept))
        }
        None => (value.trim(), None),
    }
}

/// Reverses the HTML-entity escaping of `'` and `"` used by the directory data.
pub fn decode_entities(value: &str) -> String {
    value.replace("&#039;", "'").replace("&quot;", "\"")
}

/// Applies the HTML-entity escaping of `'` and `"` used by the directory data.
pub fn encode_entities(value: &str) -> String {
    value.replace('\'', "&#039;").replace('"', "&quot;")
}
