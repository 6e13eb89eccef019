//! Directory and file nodes.
//!
//! Every directory owns its subdirectories and files outright; dropping a
//! directory drops its whole subtree. Nodes keep no parent pointers, all
//! navigation starts from the root.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::acl::PermissionTable;
use crate::path::SEPARATOR;

/// The two kinds of node.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "directory"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

/// A file: a name, a mutable payload and its permission table.
#[derive(Clone, Debug, PartialEq)]
pub struct File {
    name: String,
    content: Bytes,
    permissions: PermissionTable,
}

impl File {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            content: Bytes::new(),
            permissions: PermissionTable::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) {
        self.content = content.into();
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionTable {
        &mut self.permissions
    }
}

/// A directory: subdirectories and files keyed by name, plus its own permission table.
///
/// Subdirectory and file names share one namespace: a name is taken if it
/// appears in either table.
#[derive(Clone, Debug, PartialEq)]
pub struct Directory {
    name: String,
    directories: BTreeMap<String, Directory>,
    files: BTreeMap<String, File>,
    permissions: PermissionTable,
}

impl Directory {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            directories: BTreeMap::new(),
            files: BTreeMap::new(),
            permissions: PermissionTable::new(),
        }
    }

    pub(crate) fn root() -> Self {
        Self::new(&SEPARATOR.to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self, name: &str) -> Option<&Directory> {
        self.directories.get(name)
    }

    pub(crate) fn directory_mut(&mut self, name: &str) -> Option<&mut Directory> {
        self.directories.get_mut(name)
    }

    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.get(name)
    }

    pub(crate) fn file_mut(&mut self, name: &str) -> Option<&mut File> {
        self.files.get_mut(name)
    }

    /// Subdirectories in lexicographic order.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.directories.values()
    }

    /// Files in lexicographic order.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// Check the shared namespace of subdirectories and files.
    pub fn contains_name(&self, name: &str) -> bool {
        self.directories.contains_key(name) || self.files.contains_key(name)
    }

    /// Kind of the child called `name`, if any.
    pub fn kind_of(&self, name: &str) -> Option<NodeKind> {
        if self.directories.contains_key(name) {
            Some(NodeKind::Directory)
        } else if self.files.contains_key(name) {
            Some(NodeKind::File)
        } else {
            None
        }
    }

    /// Immediate children: subdirectories first, then files, each sorted by name.
    pub fn entries(&self) -> Vec<DirEntry> {
        let directories = self.directories.keys().map(|name| DirEntry {
            name: name.clone(),
            kind: NodeKind::Directory,
        });
        let files = self.files.keys().map(|name| DirEntry {
            name: name.clone(),
            kind: NodeKind::File,
        });
        directories.chain(files).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// Number of nodes in this subtree, this directory included.
    pub fn count_nodes(&self) -> usize {
        1 + self.files.len()
            + self
                .directories
                .values()
                .map(Directory::count_nodes)
                .sum::<usize>()
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionTable {
        &mut self.permissions
    }

    /// Callers check the shared namespace first.
    pub(crate) fn insert_directory(&mut self, directory: Directory) {
        debug_assert!(!self.contains_name(&directory.name));
        self.directories.insert(directory.name.clone(), directory);
    }

    /// Callers check the shared namespace first.
    pub(crate) fn insert_file(&mut self, file: File) {
        debug_assert!(!self.contains_name(&file.name));
        self.files.insert(file.name.clone(), file);
    }

    /// Detach a child and return the number of nodes dropped with it.
    pub(crate) fn remove_entry(&mut self, name: &str) -> Option<(NodeKind, usize)> {
        if let Some(directory) = self.directories.remove(name) {
            return Some((NodeKind::Directory, directory.count_nodes()));
        }
        self.files.remove(name).map(|_| (NodeKind::File, 1))
    }
}

impl Default for Directory {
    fn default() -> Self {
        Directory::root()
    }
}

/// A borrowed node of either kind.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    Directory(&'a Directory),
    File(&'a File),
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            NodeRef::Directory(directory) => directory.name(),
            NodeRef::File(file) => file.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::Directory(_) => NodeKind::Directory,
            NodeRef::File(_) => NodeKind::File,
        }
    }

    pub fn permissions(&self) -> &'a PermissionTable {
        match *self {
            NodeRef::Directory(directory) => directory.permissions(),
            NodeRef::File(file) => file.permissions(),
        }
    }

    pub fn as_directory(&self) -> Option<&'a Directory> {
        match *self {
            NodeRef::Directory(directory) => Some(directory),
            NodeRef::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&'a File> {
        match *self {
            NodeRef::Directory(_) => None,
            NodeRef::File(file) => Some(file),
        }
    }
}

/// One line of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Directory => write!(f, "{}{}", self.name, SEPARATOR),
            NodeKind::File => write!(f, "{}", self.name),
        }
    }
}
