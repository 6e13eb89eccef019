//! # acltree
//!
//! A permissioned in-memory directory tree: path resolution, recursive
//! name and content search, and exact per-node access checks.
//!
//! This crate re-exports [`acltree_core`] at its root and the startup seeding
//! crate as [`bootstrap`].
//!
//! ```rust
//! use acltree::bootstrap::SeedPlan;
//! use acltree::{SharedTree, TreeConfig};
//!
//! let tree = SharedTree::new(SeedPlan::university().build(TreeConfig::default()).unwrap());
//! let hits = tree.search_strings("syllabus", "/academics");
//! assert_eq!(hits, vec!["/academics/courses/CS/CS101/syllabus_fall2024.pdf"]);
//! ```

pub use acltree_bootstrap as bootstrap;
pub use acltree_core::*;
