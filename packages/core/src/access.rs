//! Permission checks.
//!
//! A check consults exactly one permission table: the one of the node the
//! path resolves to (a directory if there is one, otherwise a file). Grants
//! on ancestor directories are not inherited. Unresolvable paths deny.

use crate::path::IntoTreePath;
use crate::tree::Tree;

impl Tree {
    /// Whether `principal` holds exactly `capability` at `path`.
    ///
    /// When the tree is configured with a wildcard principal, its grants at
    /// the node count for every principal.
    pub fn check_permission(
        &self,
        principal: &str,
        path: impl IntoTreePath,
        capability: &str,
    ) -> bool {
        let Ok(path) = path.into_tree_path() else {
            return false;
        };
        let Ok(node) = self.node_at(&path) else {
            log::trace!("deny {} {} at {}: no such node", principal, capability, path);
            return false;
        };

        let table = node.permissions();
        if table.allows(principal, capability) {
            return true;
        }
        match self.config().wildcard_principal.as_deref() {
            Some(wildcard) if wildcard != principal => table.allows(wildcard, capability),
            _ => false,
        }
    }
}
