//! # acltree-bootstrap
//!
//! Populates an [`acltree_core::Tree`] once at startup. The core carries no
//! seed policy of its own; this crate turns a [`SeedPlan`] (built in code
//! or loaded from JSON) into the generic create and grant calls.
//!
//! ```rust
//! use acltree_bootstrap::SeedPlan;
//! use acltree_core::TreeConfig;
//!
//! let tree = SeedPlan::university().build(TreeConfig::default()).unwrap();
//! assert!(tree.check_permission("prof_smith", "/academics/courses/CS/CS101", "write"));
//! ```

mod error;
mod plan;
pub mod university;

pub use error::{BootstrapError, Result};
pub use plan::{SeedContent, SeedGrant, SeedNode, SeedPlan, SeedReport};
