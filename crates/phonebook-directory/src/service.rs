//! Phonebook operations on top of a directory.

use phonebook_tree::{
    DepartmentSelection, DirectoryRecord, OrgTree, Query, RenderedTree, transliterate,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{directory::Directory, error::DirectoryError};

/// Result of a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Matching people, sorted by common name.
    pub records: Vec<DirectoryRecord>,
    /// The text that produced `records`.
    pub query_used: String,
    /// True when `query_used` is the keyboard-layout transliteration of the input.
    pub transliterated: bool,
}

/// Phonebook operations bound to one directory.
#[derive(Debug, Clone)]
pub struct Phonebook<D> {
    /// Record source.
    directory: D,
    /// Display name of the tree root.
    root_name: String,
}

impl<D: Directory> Phonebook<D> {
    /// Creates a phonebook over `directory` whose tree root is called `root_name`.
    pub fn new(directory: D, root_name: impl Into<String>) -> Self {
        Self {
            directory,
            root_name: root_name.into(),
        }
    }

    /// Returns the underlying directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Fetches every person and builds the organization tree.
    pub fn load_tree(&self) -> Result<OrgTree, DirectoryError> {
        let records = self.directory.search(&Query::All)?;
        let mut tree = OrgTree::with_root_name(&self.root_name);
        tree.extend(&records);
        info!(people = records.len(), nodes = tree.len(), "organization tree built");
        Ok(tree)
    }

    /// Fetches every person and returns the display tree with sorted siblings.
    pub fn load_rendered_tree(&self) -> Result<RenderedTree, DirectoryError> {
        Ok(RenderedTree::from_tree(&self.load_tree()?))
    }

    /// Searches by free text.
    ///
    /// Blank text lists everyone. When a non-blank search finds nobody, the text is
    /// transliterated from the Latin keyboard layout to the Cyrillic one and, if that
    /// yields anything, searched once more.
    pub fn search_text(&self, text: &str) -> Result<SearchOutcome, DirectoryError> {
        self.search_text_with(text, true)
    }

    /// Searches by free text, optionally without the transliteration retry.
    pub fn search_text_with(
        &self,
        text: &str,
        fallback: bool,
    ) -> Result<SearchOutcome, DirectoryError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(SearchOutcome {
                records: self.search_sorted(&Query::All)?,
                ..SearchOutcome::default()
            });
        }

        let records = self.search_sorted(&Query::Text(text.to_string()))?;
        if !records.is_empty() || !fallback {
            return Ok(SearchOutcome {
                records,
                query_used: text.to_string(),
                transliterated: false,
            });
        }

        let converted = transliterate(text);
        if converted.is_empty() {
            debug!(text, "no results and nothing to transliterate");
            return Ok(SearchOutcome {
                records,
                query_used: text.to_string(),
                transliterated: false,
            });
        }

        debug!(text, %converted, "no results, retrying with transliterated text");
        Ok(SearchOutcome {
            records: self.search_sorted(&Query::Text(converted.clone()))?,
            query_used: converted,
            transliterated: true,
        })
    }

    /// Lists the people below a tree selection, sorted by common name.
    pub fn search_department(
        &self,
        selection: &DepartmentSelection,
    ) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        self.search_sorted(&Query::Department(selection.clone()))
    }

    /// Runs a query and sorts the result by common name.
    fn search_sorted(&self, query: &Query) -> Result<Vec<DirectoryRecord>, DirectoryError> {
        let mut records = self.directory.search(query)?;
        records.sort_by(|a, b| a.cn.cmp(&b.cn));
        Ok(records)
    }
}
