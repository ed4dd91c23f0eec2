//! Error types for tree path resolution.

use thiserror::Error;

/// Errors that can occur when resolving a logical tree path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The path contains an empty segment.
    #[error("invalid tree path '{path}': empty segment")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },
}
