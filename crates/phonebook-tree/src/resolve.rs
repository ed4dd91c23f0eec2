//! Logical path resolution against a rendered tree.
//!
//! A logical path is a colon-delimited list of node names (`"Acme:Sales:EMEA"`) derived
//! from a record's organization fields. Resolution walks a displayed tree through the
//! `TreeNavigator` primitives and produces the coordinate to expand and select.
//!
//! Resolution is forgiving: a segment without a matching sibling leaves the coordinate
//! where it is and the next segment is tried at the same level. The result is the deepest
//! coordinate reached, together with the segments that did not match.

use std::fmt;

use crate::{
    error::ResolveError,
    tree::{RenderedNode, RenderedTree, TreeCoord},
};

/// Traversal primitives over a displayed tree.
pub trait TreeNavigator {
    /// Opaque position of one node.
    type Cursor;

    /// Returns a cursor on the first child of the node at `parent`, if any.
    fn first_child(&self, parent: &TreeCoord) -> Option<Self::Cursor>;

    /// Advances to the next sibling.
    fn next_sibling(&self, cursor: &Self::Cursor) -> Option<Self::Cursor>;

    /// Returns the display name at a cursor.
    fn name_at(&self, cursor: &Self::Cursor) -> &str;
}

/// Cursor into a `RenderedTree`: the parent coordinate plus a sibling index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCursor {
    /// Coordinate of the node whose children are being scanned.
    parent: TreeCoord,
    /// Position among the parent's children.
    index: usize,
}

/// Returns the child a cursor points at.
fn node_at<'a>(tree: &'a RenderedTree, cursor: &RenderedCursor) -> Option<&'a RenderedNode> {
    tree.get(&cursor.parent)?.children.get(cursor.index)
}

impl TreeNavigator for RenderedTree {
    type Cursor = RenderedCursor;

    fn first_child(&self, parent: &TreeCoord) -> Option<Self::Cursor> {
        self.has_children(parent).then(|| RenderedCursor {
            parent: parent.clone(),
            index: 0,
        })
    }

    fn next_sibling(&self, cursor: &Self::Cursor) -> Option<Self::Cursor> {
        let next = RenderedCursor {
            parent: cursor.parent.clone(),
            index: cursor.index + 1,
        };
        node_at(self, &next).is_some().then_some(next)
    }

    fn name_at(&self, cursor: &Self::Cursor) -> &str {
        node_at(self, cursor).map_or("", |node| node.name.as_str())
    }
}

/// A validated logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPath {
    /// Trimmed, non-empty segments.
    segments: Vec<String>,
}

impl LogicalPath {
    /// Parses a colon-delimited path, trimming every segment.
    ///
    /// Fails with `ResolveError::InvalidPath` if any segment is empty after trimming,
    /// which includes the empty string.
    pub fn parse(path: &str) -> Result<Self, ResolveError> {
        let segments: Vec<String> = path.split(':').map(|s| s.trim().to_string()).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ResolveError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(Self { segments })
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(":"))
    }
}

/// Outcome of resolving a logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Deepest coordinate reached.
    pub coord: TreeCoord,
    /// Number of segments that matched.
    pub matched: usize,
    /// Segments that had no matching sibling, in path order.
    pub missed: Vec<String>,
}

impl Resolution {
    /// Returns true if every segment matched.
    pub fn is_exact(&self) -> bool {
        self.missed.is_empty()
    }

    /// Returns true if nothing matched and the coordinate still addresses the root.
    pub fn is_noop(&self) -> bool {
        self.matched == 0
    }
}

/// Resolves a logical path string against a navigator.
pub fn resolve_path<N: TreeNavigator>(path: &str, nav: &N) -> Result<Resolution, ResolveError> {
    let path = LogicalPath::parse(path)?;
    Ok(resolve(&path, nav))
}

/// Resolves an already validated logical path against a navigator.
pub fn resolve<N: TreeNavigator>(path: &LogicalPath, nav: &N) -> Resolution {
    let mut coord = TreeCoord::root();
    let mut matched = 0;
    let mut missed = Vec::new();

    for segment in path.segments() {
        match find_on_level(nav, &coord, segment) {
            Some(index) => {
                coord = coord.child(index);
                matched += 1;
            }
            None => missed.push(segment.clone()),
        }
    }

    Resolution {
        coord,
        matched,
        missed,
    }
}

/// Scans the children of `parent` for an exact name match, returning its position.
fn find_on_level<N: TreeNavigator>(nav: &N, parent: &TreeCoord, name: &str) -> Option<usize> {
    let mut cursor = nav.first_child(parent);
    let mut index = 0;
    while let Some(current) = cursor {
        if nav.name_at(&current) == name {
            return Some(index);
        }
        cursor = nav.next_sibling(&current);
        index += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::DirectoryRecord, tree::build_tree};

    fn scenario_tree() -> RenderedTree {
        let records: Vec<DirectoryRecord> = [
            ("Acme, Sales", "EMEA"),
            ("Acme, Sales", "APAC"),
            ("Beta", ""),
        ]
        .into_iter()
        .map(|(o, ou)| DirectoryRecord {
            organization: o.into(),
            unit: ou.into(),
            ..DirectoryRecord::default()
        })
        .collect();
        RenderedTree::from_tree(&build_tree(&records))
    }

    #[test]
    fn test_resolve_full_path() {
        let tree = scenario_tree();
        let res = resolve_path("Acme:Sales", &tree).unwrap();
        assert_eq!(res.coord.to_string(), "0:0:0");
        assert!(res.is_exact());
        assert_eq!(tree.get(&res.coord).unwrap().name, "Sales");
    }

    #[test]
    fn test_resolve_distinct_leaves() {
        let tree = scenario_tree();
        let emea = resolve_path("Acme:Sales:EMEA", &tree).unwrap().coord;
        let apac = resolve_path("Acme:Sales:APAC", &tree).unwrap().coord;
        let beta = resolve_path("Beta", &tree).unwrap().coord;
        assert_ne!(emea, apac);
        assert_ne!(emea, beta);
        assert_ne!(apac, beta);
        assert_eq!(emea.to_string(), "0:0:0:1");
        assert_eq!(apac.to_string(), "0:0:0:0");
        assert_eq!(beta.to_string(), "0:1");
    }

    #[test]
    fn test_missing_segment_degrades_to_deepest_match() {
        let tree = scenario_tree();
        let res = resolve_path("Acme:Missing", &tree).unwrap();
        assert_eq!(res.coord.to_string(), "0:0");
        assert_eq!(res.matched, 1);
        assert_eq!(res.missed, ["Missing"]);
    }

    #[test]
    fn test_missing_segment_does_not_abort_later_segments() {
        // The unmatched middle segment is skipped and the next one is tried one level
        // below the last match.
        let tree = scenario_tree();
        let res = resolve_path("Acme:Nowhere:Sales:EMEA", &tree).unwrap();
        assert_eq!(res.coord.to_string(), "0:0:0:1");
        assert_eq!(res.missed, ["Nowhere"]);
    }

    #[test]
    fn test_no_match_is_root_noop() {
        let tree = scenario_tree();
        let res = resolve_path("Unknown", &tree).unwrap();
        assert!(res.coord.is_root());
        assert!(res.is_noop());
    }

    #[test]
    fn test_empty_segments_are_invalid() {
        let tree = scenario_tree();
        for path in ["", "Acme::Sales", "Acme: :Sales", "Acme:"] {
            let err = resolve_path(path, &tree).unwrap_err();
            assert!(matches!(err, ResolveError::InvalidPath { .. }), "{path}");
        }
    }

    #[test]
    fn test_segments_are_trimmed_and_case_sensitive() {
        let tree = scenario_tree();
        let res = resolve_path(" Acme : Sales ", &tree).unwrap();
        assert_eq!(res.coord.to_string(), "0:0:0");

        let res = resolve_path("acme", &tree).unwrap();
        assert!(res.is_noop());
    }

    #[test]
    fn test_logical_path_display() {
        let path = LogicalPath::parse("A : B").unwrap();
        assert_eq!(path.to_string(), "A:B");
        assert_eq!(path.segments(), ["A", "B"]);
    }
}
