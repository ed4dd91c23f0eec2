//! Organization tree synthesis for the LDAP phonebook.
//!
//! This crate holds the pure, synchronous logic of the phonebook:
//!
//! - **Records**: `DirectoryRecord`, a typed view of one person entry
//! - **Tree building**: grouping records into organization → department → unit
//! - **Path resolution**: mapping a record's organization fields back onto tree coordinates
//! - **Filters**: turning search text or a tree selection into a directory filter
//! - **Transliteration**: remapping text typed in the wrong keyboard layout
//!
//! # Example
//!
//! ```
//! use phonebook_tree::{DirectoryRecord, OrgTree, RenderedTree, resolve_path};
//!
//! let records = vec![DirectoryRecord {
//!     organization: "Acme, Sales".into(),
//!     unit: "EMEA".into(),
//!     ..DirectoryRecord::default()
//! }];
//! let tree = RenderedTree::from_tree(&OrgTree::build(&records));
//! let found = resolve_path(&records[0].tree_path(), &tree).unwrap();
//! assert_eq!(found.coord.to_string(), "0:0:0:0");
//! ```

#![warn(missing_docs)]

mod error;
mod filter;
mod record;
mod resolve;
mod translit;
mod tree;

pub use error::ResolveError;
pub use filter::{
    DepartmentSelection, FilterOptions, PERSON_CLASS_FILTER, Query, department_filter,
    escape_value, person_filter, text_filter,
};
pub use record::{
    DirectoryRecord, PERSON_ATTRIBUTES, decode_entities, encode_entities, split_organization,
};
pub use resolve::{LogicalPath, RenderedCursor, Resolution, TreeNavigator, resolve, resolve_path};
pub use translit::{map_key, transliterate};
pub use tree::{
    DEFAULT_ROOT_NAME, NodeId, NodeKind, OrgNode, OrgTree, ParseCoordError, RenderedNode, RenderedTree,
    TreeCoord, build_tree,
};
