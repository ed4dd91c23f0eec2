//! LDIF content parsing.
//!
//! Handles the subset of RFC 2849 found in directory exports:
//!
//! - `#` comment lines
//! - folded lines (a continuation line starts with a single space)
//! - `attr: value` and base64-encoded `attr:: value` lines
//! - attribute options (`cn;lang-ru`), which are stripped
//! - blank lines separating entries, each starting with `dn:`
//!
//! URL-referenced values (`attr:< url`) are rejected.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};

/// One entry from an LDIF file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LdifEntry {
    /// Distinguished name.
    pub dn: String,
    /// Attribute values keyed by attribute name as written.
    pub attrs: HashMap<String, Vec<String>>,
}

impl LdifEntry {
    /// Returns true if the entry lists `class` among its object classes.
    pub fn has_object_class(&self, class: &str) -> bool {
        self.attrs
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("objectClass"))
            .flat_map(|(_, values)| values)
            .any(|value| value.eq_ignore_ascii_case(class))
    }
}

/// A syntax error in LDIF content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct LdifError {
    /// 1-based line number where the offending logical line starts.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl LdifError {
    /// Creates an error at a line.
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// A logical line after unfolding, tagged with the physical line it started on.
struct LogicalLine {
    /// 1-based starting line number.
    number: usize,
    /// Unfolded text.
    text: String,
}

/// Joins folded lines and drops comments. Blank lines are kept as entry separators.
fn unfold(input: &str) -> Vec<LogicalLine> {
    let mut lines: Vec<LogicalLine> = Vec::new();
    let mut in_comment = false;

    for (i, raw) in input.lines().enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = raw.strip_prefix(' ') {
            if in_comment {
                continue;
            }
            if let Some(last) = lines.last_mut()
                && !last.text.is_empty()
            {
                last.text.push_str(rest);
                continue;
            }
        }
        in_comment = raw.starts_with('#');
        if in_comment {
            continue;
        }
        lines.push(LogicalLine {
            number: i + 1,
            text: raw.to_string(),
        });
    }

    lines
}

/// Splits an `attr: value` / `attr:: base64` line into name and decoded value.
fn parse_attribute(line: &LogicalLine) -> Result<(String, String), LdifError> {
    let (name, rest) = line
        .text
        .split_once(':')
        .ok_or_else(|| LdifError::new(line.number, "expected 'attribute: value'"))?;

    let name = name.split(';').next().unwrap_or(name).trim();
    if name.is_empty() {
        return Err(LdifError::new(line.number, "missing attribute name"));
    }

    let value = if let Some(encoded) = rest.strip_prefix(':') {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| LdifError::new(line.number, format!("invalid base64 value: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|_| LdifError::new(line.number, "base64 value is not valid UTF-8"))?
    } else if rest.starts_with('<') {
        return Err(LdifError::new(line.number, "URL values are not supported"));
    } else {
        rest.strip_prefix(' ').unwrap_or(rest).to_string()
    };

    Ok((name.to_string(), value))
}

/// Parses LDIF content into entries.
pub fn parse_ldif(input: &str) -> Result<Vec<LdifEntry>, LdifError> {
    let mut entries = Vec::new();
    let mut current: Option<LdifEntry> = None;

    for line in unfold(input) {
        if line.text.trim().is_empty() {
            entries.extend(current.take());
            continue;
        }

        let (name, value) = parse_attribute(&line)?;
        match current.as_mut() {
            None if name.eq_ignore_ascii_case("dn") => {
                current = Some(LdifEntry {
                    dn: value,
                    attrs: HashMap::new(),
                });
            }
            None if name.eq_ignore_ascii_case("version") => {}
            None => {
                return Err(LdifError::new(
                    line.number,
                    format!("attribute '{name}' outside of an entry"),
                ));
            }
            Some(entry) => entry.attrs.entry(name).or_default().push(value),
        }
    }
    entries.extend(current);

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
version: 1

# People
dn: uid=ann,ou=people,dc=mail,dc=local
objectClass: top
objectClass: inetOrgPerson
cn: Ann Archer
o: Acme, Sales
ou: EMEA
mail: ann@acme.example

dn: ou=people,dc=mail,dc=local
objectClass: organizationalUnit
ou: people
";

    #[test]
    fn test_parse_basic_entries() {
        let entries = parse_ldif(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].dn, "uid=ann,ou=people,dc=mail,dc=local");
        assert_eq!(entries[0].attrs["o"], ["Acme, Sales"]);
        assert_eq!(entries[0].attrs["objectClass"].len(), 2);
        assert!(entries[0].has_object_class("inetorgperson"));
        assert!(!entries[1].has_object_class("inetOrgPerson"));
    }

    #[test]
    fn test_parse_folded_and_base64_values() {
        let input = "\
dn: uid=ivan,dc=mail,dc=local
cn:: 0JjQstCw0L0g0J/QtdGC0YDQvtCy
postalAddress: Lenin street,
  building 5
# comment that is
 folded
title: Engineer
";
        let entries = parse_ldif(input).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.attrs["cn"], ["Иван Петров"]);
        assert_eq!(entry.attrs["postalAddress"], ["Lenin street, building 5"]);
        assert_eq!(entry.attrs["title"], ["Engineer"]);
        assert_eq!(entry.attrs.len(), 3);
    }

    #[test]
    fn test_attribute_options_are_stripped() {
        let entries = parse_ldif("dn: x\ncn;lang-ru: Анна\n").unwrap();
        assert_eq!(entries[0].attrs["cn"], ["Анна"]);
    }

    #[test]
    fn test_crlf_and_multiple_blank_lines() {
        let entries = parse_ldif("dn: a\r\ncn: A\r\n\r\n\r\ndn: b\r\ncn: B\r\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].attrs["cn"], ["B"]);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_ldif("cn: orphan\n").unwrap_err();
        assert_eq!(err.line, 1);

        let err = parse_ldif("dn: a\ncn:: %%%\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("base64"));

        let err = parse_ldif("dn: a\n\ndn: b\njpegPhoto:< file:///tmp/p.jpg\n").unwrap_err();
        assert_eq!(err.line, 4);

        let err = parse_ldif("dn: a\nno colon here\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_error_display_names_the_line() {
        use std::error::Error;

        let err = parse_ldif("dn: a\njpegPhoto:< file:///tmp/p.jpg\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: URL values are not supported");
        let boxed: Box<dyn Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }
}
