//! Error types for tree operations.

use crate::node::NodeKind;
use crate::path::{PathError, TreePath};

/// Errors returned by tree queries and mutations.
///
/// All of these are recoverable. A denied permission check is not an
/// error; it is a `false` answer from [`Tree::check_permission`].
///
/// [`Tree::check_permission`]: crate::Tree::check_permission
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The path string or a node name is not well formed.
    #[error(transparent)]
    MalformedPath(#[from] PathError),

    /// A well-formed path whose segments do not all resolve.
    #[error("path not found: {path}")]
    PathNotFound { path: TreePath },

    /// The path resolves, but to the other kind of node.
    #[error("{path} is a {found}, expected a {expected}")]
    KindMismatch {
        path: TreePath,
        expected: NodeKind,
        found: NodeKind,
    },

    /// A sibling with the same name already exists.
    #[error("{name:?} already exists in {parent}")]
    DuplicateName { parent: TreePath, name: String },

    /// An empty principal or capability token.
    #[error("invalid {what}: {reason}")]
    InvalidToken {
        what: &'static str,
        reason: &'static str,
    },

    /// The node would sit deeper than the configured limit.
    #[error("{path} is deeper than the limit of {limit} levels")]
    DepthLimit { path: TreePath, limit: usize },

    /// The root directory always exists.
    #[error("the root directory cannot be removed")]
    RootRemoval,

    /// Configuration could not be decoded.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
