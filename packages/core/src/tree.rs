//! The tree: path resolution and structural mutation.
//!
//! Every operation re-resolves its path from the root, one segment at a
//! time. Each segment before the last must name a subdirectory; the last is
//! looked up in the table of the kind the caller asked for, so a directory
//! lookup never succeeds on a file of the same name and vice versa.
//!
//! Creation refuses nodes deeper than [`TreeConfig::depth_limit`], which
//! bounds every recursive walk over the tree.

use bytes::Bytes;

use crate::acl::PermissionTable;
use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::node::{DirEntry, Directory, File, NodeKind, NodeRef};
use crate::path::{IntoTreePath, TreePath, SEPARATOR};

/// An in-memory permissioned directory tree.
///
/// The root always exists and starts out empty, with an empty permission
/// table.
///
/// # Example
///
/// ```rust
/// use acltree_core::{Tree, MatchKind};
///
/// let mut tree = Tree::new();
/// tree.create_directory("/docs").unwrap();
/// tree.create_file("/docs/report.txt").unwrap();
/// tree.set_content("/docs/report.txt", "final draft").unwrap();
/// tree.grant_permission("/docs", "alice", "write").unwrap();
///
/// let hits = tree.search("draft", "/docs");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].kind, MatchKind::Content);
///
/// assert!(tree.check_permission("alice", "/docs", "write"));
/// assert!(!tree.check_permission("alice", "/docs", "read"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Tree {
    root: Directory,
    config: TreeConfig,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: Directory::root(),
            config,
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Locate the directory at `path`.
    pub fn resolve_directory(&self, path: impl IntoTreePath) -> Result<&Directory> {
        self.directory_at(&path.into_tree_path()?)
    }

    /// Locate the file at `path`.
    pub fn resolve_file(&self, path: impl IntoTreePath) -> Result<&File> {
        self.file_at(&path.into_tree_path()?)
    }

    /// Locate the node at `path`, preferring a directory.
    pub fn resolve(&self, path: impl IntoTreePath) -> Result<NodeRef<'_>> {
        self.node_at(&path.into_tree_path()?)
    }

    pub fn exists(&self, path: impl IntoTreePath) -> bool {
        self.resolve(path).is_ok()
    }

    /// Immediate children of the directory at `path`.
    pub fn list_directory(&self, path: impl IntoTreePath) -> Result<Vec<DirEntry>> {
        Ok(self.resolve_directory(path)?.entries())
    }

    pub fn read_content(&self, path: impl IntoTreePath) -> Result<Bytes> {
        Ok(self.resolve_file(path)?.content().clone())
    }

    /// The permission table of the node at `path`.
    pub fn permissions(&self, path: impl IntoTreePath) -> Result<&PermissionTable> {
        Ok(self.resolve(path)?.permissions())
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Indented dump of the whole tree, two spaces per level. Directories
    /// carry a trailing `/` and list their subdirectories before their files.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push(SEPARATOR);
        out.push('\n');
        render_children(&self.root, 1, &mut out);
        out
    }

    /// Create an empty node called `name` inside the directory at `parent`.
    ///
    /// This is the primitive the bootstrap collaborator drives. Returns the
    /// path of the new node.
    pub fn create(
        &mut self,
        parent: impl IntoTreePath,
        name: &str,
        kind: NodeKind,
    ) -> Result<TreePath> {
        let path = parent.into_tree_path()?.join(name)?;
        self.insert(&path, kind)?;
        Ok(path)
    }

    /// Create an empty directory. Its parent must already exist.
    pub fn create_directory(&mut self, path: impl IntoTreePath) -> Result<()> {
        self.insert(&path.into_tree_path()?, NodeKind::Directory)
    }

    /// Create an empty file. Its parent must already exist.
    pub fn create_file(&mut self, path: impl IntoTreePath) -> Result<()> {
        self.insert(&path.into_tree_path()?, NodeKind::File)
    }

    /// Replace the payload of the file at `path`.
    pub fn set_content(
        &mut self,
        path: impl IntoTreePath,
        content: impl Into<Bytes>,
    ) -> Result<()> {
        let path = path.into_tree_path()?;
        let file = self.file_at_mut(&path)?;
        file.set_content(content);
        log::debug!("set content of {} ({} bytes)", path, file.content().len());
        Ok(())
    }

    /// Grant `capability` to `principal` at the node at `path`.
    ///
    /// Permission changes are not themselves access controlled.
    pub fn grant_permission(
        &mut self,
        path: impl IntoTreePath,
        principal: &str,
        capability: &str,
    ) -> Result<()> {
        let path = path.into_tree_path()?;
        if self.permissions_at_mut(&path)?.grant(principal, capability)? {
            log::debug!("granted {} to {} at {}", capability, principal, path);
        }
        Ok(())
    }

    /// Grant several capabilities at once; nothing is granted on error.
    pub fn grant_permissions<I, S>(
        &mut self,
        path: impl IntoTreePath,
        principal: &str,
        capabilities: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = path.into_tree_path()?;
        self.permissions_at_mut(&path)?
            .grant_all(principal, capabilities)?;
        log::debug!("granted capabilities to {} at {}", principal, path);
        Ok(())
    }

    /// Withdraw a capability. Returns whether `principal` held it.
    pub fn revoke_permission(
        &mut self,
        path: impl IntoTreePath,
        principal: &str,
        capability: &str,
    ) -> Result<bool> {
        let path = path.into_tree_path()?;
        let revoked = self.permissions_at_mut(&path)?.revoke(principal, capability);
        if revoked {
            log::debug!("revoked {} from {} at {}", capability, principal, path);
        }
        Ok(revoked)
    }

    /// Remove the node at `path`, and with a directory its whole subtree.
    pub fn remove(&mut self, path: impl IntoTreePath) -> Result<NodeKind> {
        let path = path.into_tree_path()?;
        let Some((name, parent)) = path.split_last() else {
            return Err(Error::RootRemoval);
        };
        let directory = self.walk_mut(&path, parent)?;
        let (kind, dropped) = directory
            .remove_entry(name)
            .ok_or_else(|| Error::PathNotFound { path: path.clone() })?;
        log::debug!("removed {} {} ({} nodes)", kind, path, dropped);
        Ok(kind)
    }

    pub(crate) fn directory_at(&self, path: &TreePath) -> Result<&Directory> {
        let Some((name, parent)) = path.split_last() else {
            return Ok(&self.root);
        };
        let directory = self.walk(path, parent)?;
        match directory.directory(name) {
            Some(found) => Ok(found),
            None => Err(missing(path, directory, NodeKind::Directory)),
        }
    }

    pub(crate) fn file_at(&self, path: &TreePath) -> Result<&File> {
        let Some((name, parent)) = path.split_last() else {
            return Err(Error::KindMismatch {
                path: path.clone(),
                expected: NodeKind::File,
                found: NodeKind::Directory,
            });
        };
        let directory = self.walk(path, parent)?;
        match directory.file(name) {
            Some(found) => Ok(found),
            None => Err(missing(path, directory, NodeKind::File)),
        }
    }

    /// Directory match first, then file match.
    pub(crate) fn node_at(&self, path: &TreePath) -> Result<NodeRef<'_>> {
        match self.directory_at(path) {
            Ok(directory) => Ok(NodeRef::Directory(directory)),
            Err(Error::KindMismatch { .. }) => self.file_at(path).map(NodeRef::File),
            Err(e) => Err(e),
        }
    }

    fn directory_at_mut(&mut self, path: &TreePath) -> Result<&mut Directory> {
        let Some((name, parent)) = path.split_last() else {
            return Ok(&mut self.root);
        };
        let directory = self.walk_mut(path, parent)?;
        if directory.directory(name).is_none() {
            return Err(missing(path, directory, NodeKind::Directory));
        }
        directory
            .directory_mut(name)
            .ok_or_else(|| Error::PathNotFound { path: path.clone() })
    }

    fn file_at_mut(&mut self, path: &TreePath) -> Result<&mut File> {
        let Some((name, parent)) = path.split_last() else {
            return Err(Error::KindMismatch {
                path: path.clone(),
                expected: NodeKind::File,
                found: NodeKind::Directory,
            });
        };
        let directory = self.walk_mut(path, parent)?;
        if directory.file(name).is_none() {
            return Err(missing(path, directory, NodeKind::File));
        }
        directory
            .file_mut(name)
            .ok_or_else(|| Error::PathNotFound { path: path.clone() })
    }

    fn permissions_at_mut(&mut self, path: &TreePath) -> Result<&mut PermissionTable> {
        let kind = self.node_at(path)?.kind();
        match kind {
            NodeKind::Directory => Ok(self.directory_at_mut(path)?.permissions_mut()),
            NodeKind::File => Ok(self.file_at_mut(path)?.permissions_mut()),
        }
    }

    /// Follow `segments` through subdirectories. Failures report `target`.
    fn walk(&self, target: &TreePath, segments: &[String]) -> Result<&Directory> {
        let mut current = &self.root;
        for segment in segments {
            current = current.directory(segment).ok_or_else(|| {
                log::trace!("no directory {:?} on the way to {}", segment, target);
                Error::PathNotFound {
                    path: target.clone(),
                }
            })?;
        }
        Ok(current)
    }

    fn walk_mut(&mut self, target: &TreePath, segments: &[String]) -> Result<&mut Directory> {
        let mut current = &mut self.root;
        for segment in segments {
            current = current
                .directory_mut(segment)
                .ok_or_else(|| Error::PathNotFound {
                    path: target.clone(),
                })?;
        }
        Ok(current)
    }

    fn insert(&mut self, path: &TreePath, kind: NodeKind) -> Result<()> {
        let Some((name, _)) = path.split_last() else {
            return Err(Error::DuplicateName {
                parent: TreePath::root(),
                name: SEPARATOR.to_string(),
            });
        };
        let limit = self.config.depth_limit();
        let parent_path = path.parent().unwrap_or_default();
        let parent = self.directory_at_mut(&parent_path).map_err(|e| match e {
            Error::KindMismatch { path, .. } => Error::PathNotFound { path },
            e => e,
        })?;

        if path.len() > limit {
            return Err(Error::DepthLimit {
                path: path.clone(),
                limit,
            });
        }

        if parent.contains_name(name) {
            return Err(Error::DuplicateName {
                parent: parent_path,
                name: name.to_string(),
            });
        }
        match kind {
            NodeKind::Directory => parent.insert_directory(Directory::new(name)),
            NodeKind::File => parent.insert_file(File::new(name)),
        }
        log::debug!("created {} {}", kind, path);
        Ok(())
    }
}

/// The error for a final segment absent from the table of the expected kind.
fn missing(path: &TreePath, parent: &Directory, expected: NodeKind) -> Error {
    let name = path.name().unwrap_or_default();
    match parent.kind_of(name) {
        Some(found) if found != expected => Error::KindMismatch {
            path: path.clone(),
            expected,
            found,
        },
        _ => Error::PathNotFound { path: path.clone() },
    }
}

fn render_children(directory: &Directory, depth: usize, out: &mut String) {
    for child in directory.directories() {
        push_line(out, depth, &format!("{}{}", child.name(), SEPARATOR));
        render_children(child, depth + 1, out);
    }
    for file in directory.files() {
        push_line(out, depth, file.name());
    }
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_DEPTH_CEILING;
    use crate::tree_path;

    fn docs_tree() -> Tree {
        let mut tree = Tree::new();
        tree.create_directory("/docs").unwrap();
        tree.create_file("/docs/report.txt").unwrap();
        tree.set_content("/docs/report.txt", "final draft").unwrap();
        tree
    }

    #[test]
    fn empty_tree_has_only_root() {
        let tree = Tree::new();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.resolve_directory("/").unwrap().name(), "/");
        assert!(tree.list_directory("/").unwrap().is_empty());
        assert!(tree.permissions("/").unwrap().is_empty());
    }

    #[test]
    fn resolve_created_nodes() {
        let tree = docs_tree();
        assert_eq!(tree.resolve_directory("/docs").unwrap().name(), "docs");
        let file = tree.resolve_file("/docs/report.txt").unwrap();
        assert_eq!(file.content().as_ref(), b"final draft");
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn resolve_missing_path() {
        let tree = docs_tree();
        let err = tree.resolve_directory("/nonexistent/path").unwrap_err();
        assert_eq!(
            err,
            Error::PathNotFound {
                path: tree_path!("/nonexistent/path")
            }
        );
        assert!(matches!(
            tree.resolve_file("/docs/missing.txt"),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn resolve_malformed_path() {
        let tree = docs_tree();
        for path in ["docs", "", "/docs/", "//docs"] {
            assert!(
                matches!(tree.resolve_directory(path), Err(Error::MalformedPath(_))),
                "{path:?}"
            );
        }
    }

    #[test]
    fn resolve_never_crosses_kinds() {
        let tree = docs_tree();
        assert!(matches!(
            tree.resolve_directory("/docs/report.txt"),
            Err(Error::KindMismatch {
                expected: NodeKind::Directory,
                found: NodeKind::File,
                ..
            })
        ));
        assert!(matches!(
            tree.resolve_file("/docs"),
            Err(Error::KindMismatch {
                expected: NodeKind::File,
                found: NodeKind::Directory,
                ..
            })
        ));
        assert!(matches!(
            tree.resolve_file("/"),
            Err(Error::KindMismatch { .. })
        ));
    }

    #[test]
    fn file_is_not_an_intermediate_directory() {
        let tree = docs_tree();
        assert!(matches!(
            tree.resolve_file("/docs/report.txt/inner"),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn dot_segments_are_plain_names() {
        let mut tree = docs_tree();
        assert!(tree.resolve_directory("/docs/..").is_err());
        tree.create_directory("/docs/..").unwrap();
        assert_eq!(tree.resolve_directory("/docs/..").unwrap().name(), "..");
    }

    #[test]
    fn resolve_prefers_directory() {
        let tree = docs_tree();
        assert_eq!(tree.resolve("/docs").unwrap().kind(), NodeKind::Directory);
        assert_eq!(
            tree.resolve("/docs/report.txt").unwrap().kind(),
            NodeKind::File
        );
        assert!(tree.exists("/"));
        assert!(!tree.exists("/nope"));
    }

    #[test]
    fn create_requires_parent() {
        let mut tree = Tree::new();
        let err = tree.create_file("/nonexistent/file.txt").unwrap_err();
        assert_eq!(
            err,
            Error::PathNotFound {
                path: tree_path!("/nonexistent")
            }
        );
        assert!(matches!(
            tree.create_directory("/a/b"),
            Err(Error::PathNotFound { .. })
        ));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn create_under_file_fails() {
        let mut tree = docs_tree();
        assert!(matches!(
            tree.create_file("/docs/report.txt/child"),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn names_unique_across_kinds() {
        let mut tree = docs_tree();
        let err = tree.create_directory("/docs/report.txt").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateName {
                parent: tree_path!("/docs"),
                name: "report.txt".to_string()
            }
        );
        assert!(matches!(
            tree.create_file("/docs"),
            Err(Error::DuplicateName { .. })
        ));
        assert!(matches!(
            tree.create_directory("/"),
            Err(Error::DuplicateName { .. })
        ));
        // Case-sensitive: a differently cased name is a different node
        tree.create_directory("/Docs").unwrap();
    }

    #[test]
    fn create_primitive_returns_path() {
        let mut tree = Tree::new();
        let path = tree.create("/", "academics", NodeKind::Directory).unwrap();
        assert_eq!(path, tree_path!("/academics"));
        let path = tree
            .create(&path, "calendar.ics", NodeKind::File)
            .unwrap();
        assert_eq!(path.to_string(), "/academics/calendar.ics");
        assert!(matches!(
            tree.create("/", "a/b", NodeKind::Directory),
            Err(Error::MalformedPath(_))
        ));
        assert!(matches!(
            tree.create("/", "", NodeKind::File),
            Err(Error::MalformedPath(_))
        ));
    }

    #[test]
    fn content_roundtrip() {
        let mut tree = docs_tree();
        tree.set_content("/docs/report.txt", b"\x00\xffbinary".to_vec())
            .unwrap();
        assert_eq!(
            tree.read_content("/docs/report.txt").unwrap().as_ref(),
            b"\x00\xffbinary"
        );
        assert!(matches!(
            tree.set_content("/docs", "x"),
            Err(Error::KindMismatch { .. })
        ));
        assert!(matches!(
            tree.set_content("/docs/none.txt", "x"),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn grant_and_revoke() {
        let mut tree = docs_tree();
        tree.grant_permission("/docs", "alice", "write").unwrap();
        tree.grant_permission("/docs/report.txt", "bob", "read")
            .unwrap();

        assert!(tree.permissions("/docs").unwrap().allows("alice", "write"));
        assert!(tree
            .permissions("/docs/report.txt")
            .unwrap()
            .allows("bob", "read"));
        assert!(!tree.permissions("/docs").unwrap().allows("bob", "read"));

        assert!(tree.revoke_permission("/docs", "alice", "write").unwrap());
        assert!(!tree.revoke_permission("/docs", "alice", "write").unwrap());
        assert!(matches!(
            tree.grant_permission("/missing", "alice", "read"),
            Err(Error::PathNotFound { .. })
        ));
        assert!(matches!(
            tree.grant_permission("/docs", "", "read"),
            Err(Error::InvalidToken { .. })
        ));
    }

    #[test]
    fn grant_many() {
        let mut tree = docs_tree();
        tree.grant_permissions("/docs", "alice", ["read", "write"])
            .unwrap();
        let caps: Vec<&str> = tree
            .permissions("/docs")
            .unwrap()
            .capabilities("alice")
            .collect();
        assert_eq!(caps, vec!["read", "write"]);
    }

    #[test]
    fn remove_drops_subtree() {
        let mut tree = docs_tree();
        tree.create_directory("/docs/archive").unwrap();
        tree.create_file("/docs/archive/old.txt").unwrap();
        assert_eq!(tree.node_count(), 5);

        assert_eq!(tree.remove("/docs").unwrap(), NodeKind::Directory);
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.exists("/docs/archive/old.txt"));

        assert!(matches!(
            tree.remove("/docs"),
            Err(Error::PathNotFound { .. })
        ));
        assert_eq!(tree.remove("/").unwrap_err(), Error::RootRemoval);
    }

    #[test]
    fn remove_file() {
        let mut tree = docs_tree();
        assert_eq!(tree.remove("/docs/report.txt").unwrap(), NodeKind::File);
        assert!(tree.resolve_directory("/docs").unwrap().is_empty());
    }

    #[test]
    fn listing_marks_directories() {
        let mut tree = docs_tree();
        tree.create_directory("/docs/archive").unwrap();
        let listing: Vec<String> = tree
            .list_directory("/docs")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(listing, vec!["archive/", "report.txt"]);
        assert!(matches!(
            tree.list_directory("/docs/report.txt"),
            Err(Error::KindMismatch { .. })
        ));
    }

    #[test]
    fn render_indents_by_depth() {
        let mut tree = docs_tree();
        tree.create_directory("/docs/archive").unwrap();
        tree.create_file("/readme").unwrap();
        assert_eq!(
            tree.render(),
            "/\n  docs/\n    archive/\n    report.txt\n  readme\n"
        );
    }

    #[test]
    fn creation_beyond_depth_limit_fails() {
        let mut tree = Tree::with_config(TreeConfig::default().with_max_depth(2));
        tree.create_directory("/a").unwrap();
        tree.create_directory("/a/b").unwrap();

        assert_eq!(
            tree.create_file("/a/b/c"),
            Err(Error::DepthLimit {
                path: tree_path!("/a/b/c"),
                limit: 2,
            })
        );
        assert!(matches!(
            tree.create(tree_path!("/a/b"), "d", NodeKind::Directory),
            Err(Error::DepthLimit { limit: 2, .. })
        ));
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn deep_chain_stops_at_ceiling() {
        let mut tree = Tree::with_config(TreeConfig::default().with_max_depth(usize::MAX));
        let mut path = TreePath::root();
        let err = loop {
            path = path.join("d").unwrap();
            if let Err(e) = tree.create_directory(&path) {
                break e;
            }
        };

        assert!(matches!(err, Error::DepthLimit { limit, .. } if limit == MAX_DEPTH_CEILING));
        assert_eq!(tree.node_count(), MAX_DEPTH_CEILING + 1);
        assert_eq!(tree.render().lines().count(), MAX_DEPTH_CEILING + 1);
    }
}
