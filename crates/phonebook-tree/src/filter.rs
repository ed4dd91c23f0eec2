//! Directory filter construction.
//!
//! Filters are produced from two kinds of user intent: free text typed into the search
//! box, and a node selected in the organization tree. `Query` is the typed form of both;
//! it renders to an LDAP filter string and can also be evaluated directly against a
//! record, so that file-backed directories answer the same queries as a server.

use serde::Serialize;

use crate::{
    record::{DirectoryRecord, encode_entities},
    tree::{NodeKind, RenderedTree, TreeCoord},
};

/// Object class every person entry carries.
pub const PERSON_CLASS_FILTER: &str = "(objectClass=inetOrgPerson)";

/// Options controlling filter rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Escape filter metacharacters in assertion values.
    pub escape: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self { escape: true }
    }
}

impl FilterOptions {
    /// Options that reproduce the legacy, unescaped output.
    pub fn legacy() -> Self {
        Self { escape: false }
    }

    /// Prepares an assertion value according to these options.
    fn value(self, raw: &str) -> String {
        if self.escape {
            escape_value(raw)
        } else {
            raw.to_string()
        }
    }
}

/// Escapes an assertion value as described in RFC 4515.
pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\\' => out.push_str("\\5c"),
            '\0' => out.push_str("\\00"),
            other => out.push(other),
        }
    }
    out
}

/// Builds the substring filter over name, mail and phone for free text.
pub fn text_filter(text: &str, opts: FilterOptions) -> String {
    let t = opts.value(text);
    format!("(|(cn=*{t}*)(mail=*{t}*)(telephoneNumber=*{t}*))")
}

/// A tree selection that maps to a department filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepartmentSelection {
    /// A unit below a department: organization → department → unit.
    UnitUnderDepartment {
        /// Organization name.
        org: String,
        /// Department name.
        dept: String,
        /// Unit name.
        unit: String,
    },
    /// A unit directly below an organization.
    UnitUnderOrganization {
        /// Organization name.
        org: String,
        /// Unit name.
        unit: String,
    },
    /// A department node, with or without units below it.
    Department {
        /// Organization name.
        org: String,
        /// Department name.
        dept: String,
    },
}

impl DepartmentSelection {
    /// Maps a rendered-tree selection onto a department selection.
    ///
    /// A node four levels deep (root, organization, department, unit) selects a unit
    /// under a department. A node three levels deep selects the whole department when it
    /// was built from a department, or a unit under the organization otherwise.
    /// Shallower selections have no filter and yield `None`.
    pub fn from_rendered(tree: &RenderedTree, coord: &TreeCoord) -> Option<Self> {
        let route = tree.route(coord)?;
        match route.as_slice() {
            [org, dept, unit] => Some(Self::UnitUnderDepartment {
                org: (*org).to_string(),
                dept: (*dept).to_string(),
                unit: (*unit).to_string(),
            }),
            [org, second] if tree.get(coord)?.kind == NodeKind::Department => {
                Some(Self::Department {
                    org: (*org).to_string(),
                    dept: (*second).to_string(),
                })
            }
            [org, second] => Some(Self::UnitUnderOrganization {
                org: (*org).to_string(),
                unit: (*second).to_string(),
            }),
            _ => None,
        }
    }

    /// Returns the organization value the directory stores for this selection.
    fn organization_value(&self) -> String {
        match self {
            Self::UnitUnderDepartment { org, dept, .. } | Self::Department { org, dept } => {
                format!("{org}, {dept}")
            }
            Self::UnitUnderOrganization { org, .. } => org.clone(),
        }
    }

    /// Returns the unit value, if the selection targets a unit.
    fn unit_value(&self) -> Option<&str> {
        match self {
            Self::UnitUnderDepartment { unit, .. } | Self::UnitUnderOrganization { unit, .. } => {
                Some(unit)
            }
            Self::Department { .. } => None,
        }
    }
}

/// Builds the equality filter selecting the people below a tree node.
pub fn department_filter(selection: &DepartmentSelection, opts: FilterOptions) -> String {
    let o = opts.value(&selection.organization_value());
    match selection.unit_value() {
        Some(unit) => format!("(&(o={o})(ou={}))", opts.value(unit)),
        None => format!("(o={o})"),
    }
}

/// Restricts a filter to person entries and entity-encodes quotes.
pub fn person_filter(inner: &str) -> String {
    encode_entities(&format!("(&{PERSON_CLASS_FILTER}{inner})"))
}

/// A typed directory query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Query {
    /// Every person entry (used to build the tree).
    All,
    /// Free-text search over name, mail and phone.
    Text(String),
    /// People below a tree node.
    Department(DepartmentSelection),
}

impl Query {
    /// Renders the filter for this query without the person restriction.
    pub fn to_filter(&self, opts: FilterOptions) -> String {
        match self {
            Self::All => PERSON_CLASS_FILTER.to_string(),
            Self::Text(text) => text_filter(text, opts),
            Self::Department(selection) => department_filter(selection, opts),
        }
    }

    /// Renders the complete filter sent to the directory.
    pub fn directory_filter(&self, opts: FilterOptions) -> String {
        match self {
            Self::All => PERSON_CLASS_FILTER.to_string(),
            _ => person_filter(&self.to_filter(opts)),
        }
    }

    /// Evaluates the query against a record with directory matching rules.
    ///
    /// Substring and equality matches ignore case and collapse runs of whitespace, as
    /// the `caseIgnoreMatch` family of matching rules does. Quotes in the query are
    /// entity-encoded first, the same way `person_filter` sends them to a server.
    pub fn matches(&self, record: &DirectoryRecord) -> bool {
        match self {
            Self::All => true,
            Self::Text(text) => {
                let needle = normalize(&encode_entities(text));
                [&record.cn, &record.mail, &record.telephone_number]
                    .iter()
                    .any(|value| normalize(value).contains(&needle))
            }
            Self::Department(selection) => {
                let organization = encode_entities(&selection.organization_value());
                normalize(&record.organization) == normalize(&organization)
                    && selection.unit_value().is_none_or(|unit| {
                        normalize(&record.unit) == normalize(&encode_entities(unit))
                    })
            }
        }
    }
}

/// Lowercases and collapses whitespace for case-insensitive comparisons.
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
