//! acltree core: a permissioned in-memory directory tree
//!
//! This crate models a hierarchy of directories and files in which every
//! node carries its own permission table:
//! - `TreePath`: validated absolute path (`/`, `/docs/report.txt`)
//! - `Tree`: the owned node hierarchy, resolution and mutation
//! - `PermissionTable`: principal to capability-set grants per node
//! - `Tree::search`: recursive name/content substring search
//! - `Tree::check_permission`: exact, non-inherited access checks
//! - `SharedTree`: the tree behind one reader-writer lock
//!
//! It is not a POSIX file system: there are no inodes, links, descriptors
//! or durability. Populating the tree at startup is left to a separate
//! bootstrap collaborator that drives the generic create and grant calls.
//!
//! # Example
//!
//! ```rust
//! use acltree_core::{Error, Tree, tree_path};
//!
//! let mut tree = Tree::new();
//! tree.create_directory("/docs").unwrap();
//!
//! let err = tree.resolve_directory("/nonexistent/path").unwrap_err();
//! assert_eq!(err, Error::PathNotFound { path: tree_path!("/nonexistent/path") });
//! ```

pub use bytes::Bytes;

pub mod acl;
mod access;
pub mod config;
mod error;
mod node;
mod path;
mod search;
mod shared;
mod tree;

pub use acl::{PermissionTable, READ, WRITE};
pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node::{DirEntry, Directory, File, NodeKind, NodeRef};
pub use path::{validate_name, IntoTreePath, PathError, TreePath, SEPARATOR};
pub use search::{MatchKind, SearchHit};
pub use shared::SharedTree;
pub use tree::Tree;
