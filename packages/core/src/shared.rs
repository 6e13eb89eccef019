//! A tree shared between threads behind a single reader-writer lock.
//!
//! Structural and permission changes take the write lock; resolution,
//! search and access checks take the read lock. Readers therefore never
//! observe a partially created or partially removed subtree.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;

use crate::error::Result;
use crate::node::{DirEntry, NodeKind};
use crate::path::{IntoTreePath, TreePath};
use crate::search::SearchHit;
use crate::tree::Tree;

/// Cloneable handle to a [`Tree`].
///
/// Every method is atomic with respect to the others. For several steps
/// that must appear as one, hold the guard from [`SharedTree::write`].
#[derive(Clone, Debug, Default)]
pub struct SharedTree {
    inner: Arc<RwLock<Tree>>,
}

impl SharedTree {
    pub fn new(tree: Tree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Shared access. A panic in another holder does not leave the tree
    /// half-modified, so a poisoned lock is entered anyway.
    pub fn read(&self) -> RwLockReadGuard<'_, Tree> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Tree> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn kind_of(&self, path: impl IntoTreePath) -> Result<NodeKind> {
        Ok(self.read().resolve(path)?.kind())
    }

    pub fn list_directory(&self, path: impl IntoTreePath) -> Result<Vec<DirEntry>> {
        self.read().list_directory(path)
    }

    pub fn read_content(&self, path: impl IntoTreePath) -> Result<Bytes> {
        self.read().read_content(path)
    }

    pub fn search(&self, query: &str, start: impl IntoTreePath) -> Vec<SearchHit> {
        self.read().search(query, start)
    }

    pub fn search_strings(&self, query: &str, start: impl IntoTreePath) -> Vec<String> {
        self.read().search_strings(query, start)
    }

    pub fn check_permission(
        &self,
        principal: &str,
        path: impl IntoTreePath,
        capability: &str,
    ) -> bool {
        self.read().check_permission(principal, path, capability)
    }

    pub fn render(&self) -> String {
        self.read().render()
    }

    pub fn create(
        &self,
        parent: impl IntoTreePath,
        name: &str,
        kind: NodeKind,
    ) -> Result<TreePath> {
        self.write().create(parent, name, kind)
    }

    pub fn create_directory(&self, path: impl IntoTreePath) -> Result<()> {
        self.write().create_directory(path)
    }

    pub fn create_file(&self, path: impl IntoTreePath) -> Result<()> {
        self.write().create_file(path)
    }

    pub fn set_content(&self, path: impl IntoTreePath, content: impl Into<Bytes>) -> Result<()> {
        self.write().set_content(path, content)
    }

    pub fn grant_permission(
        &self,
        path: impl IntoTreePath,
        principal: &str,
        capability: &str,
    ) -> Result<()> {
        self.write().grant_permission(path, principal, capability)
    }

    pub fn revoke_permission(
        &self,
        path: impl IntoTreePath,
        principal: &str,
        capability: &str,
    ) -> Result<bool> {
        self.write().revoke_permission(path, principal, capability)
    }

    pub fn remove(&self, path: impl IntoTreePath) -> Result<NodeKind> {
        self.write().remove(path)
    }
}

impl From<Tree> for SharedTree {
    fn from(tree: Tree) -> Self {
        Self::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handles_share_one_tree() {
        let tree = SharedTree::default();
        let other = tree.clone();
        tree.create_directory("/docs").unwrap();
        assert_eq!(other.kind_of("/docs").unwrap(), NodeKind::Directory);
    }

    #[test]
    fn guard_groups_steps() {
        let tree = SharedTree::default();
        {
            let mut guard = tree.write();
            guard.create_directory("/docs").unwrap();
            guard.create_file("/docs/report.txt").unwrap();
            guard.set_content("/docs/report.txt", "final draft").unwrap();
        }
        assert_eq!(
            tree.read_content("/docs/report.txt").unwrap().as_ref(),
            b"final draft"
        );
    }

    #[test]
    fn readers_see_whole_subtrees() {
        let tree = SharedTree::default();
        tree.create_directory("/jobs").unwrap();

        thread::scope(|scope| {
            let writer = tree.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    let mut guard = writer.write();
                    let dir = format!("/jobs/{}", i);
                    guard.create_directory(&dir).unwrap();
                    guard.create_file(&format!("{}/result", dir)).unwrap();
                }
            });

            for _ in 0..4 {
                let reader = tree.clone();
                scope.spawn(move || {
                    for _ in 0..50 {
                        let guard = reader.read();
                        let dirs = guard.list_directory("/jobs").unwrap().len();
                        let files = guard.search("result", "/jobs").len();
                        assert_eq!(dirs, files);
                    }
                });
            }
        });

        assert_eq!(tree.search("result", "/jobs").len(), 50);
    }

    #[test]
    fn poisoned_lock_is_still_usable() {
        let tree = SharedTree::default();
        let clone = tree.clone();
        let _ = thread::spawn(move || {
            let _guard = clone.write();
            panic!("writer died");
        })
        .join();

        tree.create_directory("/after").unwrap();
        assert!(!tree.check_permission("all", "/after", "read"));
        assert_eq!(tree.list_directory("/").unwrap().len(), 1);
    }
}
