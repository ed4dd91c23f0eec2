//! Organization tree construction and materialization.
//!
//! `OrgTree` is a name hierarchy built from a batch of directory records: organization,
//! then department, then unit. It is stored as an arena of nodes addressed by `NodeId`,
//! with a name index per node so that "find or create" is a single lookup.
//!
//! Sibling order in an `OrgTree` is insertion order and carries no meaning. Before a tree
//! is shown it is materialized into a `RenderedTree`, whose siblings are sorted
//! case-insensitively and whose nodes are addressed by positional `TreeCoord`s.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
};

use serde::Serialize;

use crate::record::{DirectoryRecord, decode_entities, split_organization};

/// Display name of the root node when none is configured.
pub const DEFAULT_ROOT_NAME: &str = "Organizations and departments";

/// Index of a node inside an `OrgTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The level a node was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The display root.
    Root,
    /// An organization, the part of `o` before the first comma.
    Organization,
    /// A department, the part of `o` after the first comma.
    Department,
    /// A unit, taken from `ou`.
    Unit,
}

/// A node of the organization tree.
#[derive(Debug, Clone)]
pub struct OrgNode {
    /// Display name.
    name: String,
    /// What the node groups.
    kind: NodeKind,
    /// Depth below the root (root = 0).
    depth: usize,
    /// Children in insertion order.
    children: Vec<NodeId>,
    /// Name index over `children`.
    index: HashMap<String, NodeId>,
}

impl OrgNode {
    /// Creates an empty node.
    fn new(name: &str, kind: NodeKind, depth: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            depth,
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the depth below the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns what the node groups.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// Hierarchy of organizations, departments and units.
#[derive(Debug, Clone)]
pub struct OrgTree {
    /// Node arena; index 0 is the root.
    nodes: Vec<OrgNode>,
}

impl Default for OrgTree {
    fn default() -> Self {
        Self::with_root_name(DEFAULT_ROOT_NAME)
    }
}

impl OrgTree {
    /// Creates a tree containing only a root with the given display name.
    pub fn with_root_name(root_name: &str) -> Self {
        Self {
            nodes: vec![OrgNode::new(root_name, NodeKind::Root, 0)],
        }
    }

    /// Builds a tree from a batch of records using the default root name.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DirectoryRecord>,
    {
        let mut tree = Self::default();
        tree.extend(records);
        tree
    }

    /// Adds the grouping nodes for every record in the batch.
    ///
    /// Records with an empty organization are skipped. A record whose organization
    /// carries a department (`"org, dept"`) lands under org → dept → unit; otherwise its
    /// unit is placed directly under the organization.
    pub fn extend<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a DirectoryRecord>,
    {
        for record in records {
            self.insert_record(record);
        }
    }

    /// Adds the grouping nodes for one record.
    fn insert_record(&mut self, record: &DirectoryRecord) {
        let organization = decode_entities(&record.organization);
        let (org_name, dept_name) = split_organization(&organization);
        if org_name.is_empty() {
            return;
        }

        let org = self.child_or_insert(self.root(), org_name, NodeKind::Organization);
        let parent = match dept_name {
            Some(dept) => self.child_or_insert(org, dept, NodeKind::Department),
            None => org,
        };

        let unit = decode_entities(record.unit.trim());
        if !unit.is_empty() {
            self.child_or_insert(parent, &unit, NodeKind::Unit);
        }
    }

    /// Returns the child of `parent` named `name`, creating it if needed.
    ///
    /// A name used both as a unit directly under an organization and as a department of
    /// it is one node, kept as a department.
    pub fn child_or_insert(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        if let Some(&id) = self.nodes[parent.0].index.get(name) {
            if kind == NodeKind::Department {
                self.nodes[id.0].kind = kind;
            }
            return id;
        }
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(OrgNode::new(name, kind, depth));
        let node = &mut self.nodes[parent.0];
        node.children.push(id);
        node.index.insert(name.to_string(), id);
        id
    }

    /// Returns the root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node for an id.
    pub fn node(&self, id: NodeId) -> &OrgNode {
        &self.nodes[id.0]
    }

    /// Returns the display name of a node.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Returns what a node groups.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Returns the depth of a node (root = 0).
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    /// Returns the children of a node in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Looks up a direct child by exact name.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id.0].index.get(name).copied()
    }

    /// Follows a sequence of names from the root.
    pub fn find<S: AsRef<str>>(&self, segments: &[S]) -> Option<NodeId> {
        segments
            .iter()
            .try_fold(self.root(), |id, segment| self.child(id, segment.as_ref()))
    }

    /// Returns the set of child names of a node.
    pub fn keys_at(&self, id: NodeId) -> BTreeSet<&str> {
        self.nodes[id.0].index.keys().map(String::as_str).collect()
    }

    /// Returns the total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

/// Builds an organization tree from a batch of records.
pub fn build_tree(records: &[DirectoryRecord]) -> OrgTree {
    OrgTree::build(records)
}

/// Positional address of a node in a rendered tree, printed as `"0:2:1"`.
///
/// The first index always addresses the root display node; each following index is a
/// 0-based sibling position one level deeper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct TreeCoord(Vec<usize>);

impl TreeCoord {
    /// Returns the coordinate of the root display node.
    pub fn root() -> Self {
        Self(vec![0])
    }

    /// Returns the coordinate of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Returns the parent coordinate, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        (self.0.len() > 1).then(|| Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Returns the number of indices (root = 1, organization = 2, ...).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns the raw indices.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns true if this addresses the root display node.
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }
}

impl fmt::Display for TreeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl From<TreeCoord> for String {
    fn from(coord: TreeCoord) -> Self {
        coord.to_string()
    }
}

/// Error returned when a coordinate string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tree coordinate: {0}")]
pub struct ParseCoordError(String);

impl FromStr for TreeCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(':')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseCoordError(s.to_string()))?;
        if indices.first() != Some(&0) {
            return Err(ParseCoordError(s.to_string()));
        }
        Ok(Self(indices))
    }
}

/// A node of a rendered tree.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNode {
    /// Display name.
    pub name: String,
    /// What the node groups.
    pub kind: NodeKind,
    /// Children in display order.
    pub children: Vec<RenderedNode>,
}

/// An organization tree materialized for display, with sorted siblings.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTree {
    /// The root display node.
    root: RenderedNode,
}

impl RenderedTree {
    /// Materializes an `OrgTree`, sorting each sibling list case-insensitively.
    pub fn from_tree(tree: &OrgTree) -> Self {
        Self {
            root: render_node(tree, tree.root()),
        }
    }

    /// Returns the root display node.
    pub fn root(&self) -> &RenderedNode {
        &self.root
    }

    /// Returns the node at a coordinate.
    pub fn get(&self, coord: &TreeCoord) -> Option<&RenderedNode> {
        let (first, rest) = coord.indices().split_first()?;
        if *first != 0 {
            return None;
        }
        rest.iter()
            .try_fold(&self.root, |node, &index| node.children.get(index))
    }

    /// Returns true if the node at `coord` exists and has children.
    pub fn has_children(&self, coord: &TreeCoord) -> bool {
        self.get(coord).is_some_and(|node| !node.children.is_empty())
    }

    /// Returns the names from the organization level down to the node at `coord`.
    ///
    /// The root display name is not included. Returns `None` for an unknown coordinate.
    pub fn route(&self, coord: &TreeCoord) -> Option<Vec<&str>> {
        let (first, rest) = coord.indices().split_first()?;
        if *first != 0 {
            return None;
        }
        let mut names = Vec::with_capacity(rest.len());
        let mut node = &self.root;
        for &index in rest {
            node = node.children.get(index)?;
            names.push(node.name.as_str());
        }
        Some(names)
    }

    /// Walks the tree in pre-order, yielding each node with its coordinate.
    pub fn walk(&self) -> Vec<(TreeCoord, &RenderedNode)> {
        let mut out = Vec::new();
        let mut stack = vec![(TreeCoord::root(), &self.root)];
        while let Some((coord, node)) = stack.pop() {
            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((coord.child(i), child));
            }
            out.push((coord, node));
        }
        out
    }
}

/// Recursively renders a subtree with sorted siblings.
fn render_node(tree: &OrgTree, id: NodeId) -> RenderedNode {
    let mut children: Vec<NodeId> = tree.children(id).to_vec();
    children.sort_by_cached_key(|&child| tree.name(child).to_lowercase());
    RenderedNode {
        name: tree.name(id).to_string(),
        kind: tree.kind(id),
        children: children
            .into_iter()
            .map(|child| render_node(tree, child))
            .collect(),
    }
}
