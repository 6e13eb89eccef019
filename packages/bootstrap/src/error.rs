//! Error types for seeding a tree.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum BootstrapError {
    /// A step of a seed plan was rejected by the tree.
    #[error("seed step failed ({step}): {source}")]
    Step {
        step: String,
        #[source]
        source: acltree_core::Error,
    },

    /// A tree operation outside of a plan failed.
    #[error("tree error: {0}")]
    Tree(#[from] acltree_core::Error),

    #[error("failed to read seed plan {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed plan: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
