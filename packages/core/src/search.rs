//! Recursive substring search over file names and contents.

use std::fmt;

use crate::node::Directory;
use crate::path::{IntoTreePath, TreePath};
use crate::tree::Tree;

/// What a hit matched on.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum MatchKind {
    Name,
    Content,
}

/// One search result.
///
/// A file that matches on both name and content yields two hits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub path: TreePath,
    pub kind: MatchKind,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MatchKind::Name => write!(f, "{}", self.path),
            MatchKind::Content => write!(f, "{} (content match)", self.path),
        }
    }
}

impl Tree {
    /// Find every file below `start` whose name or content contains `query`.
    ///
    /// The walk is depth first: within a directory, files are checked in
    /// name order (name hit before content hit), then subdirectories are
    /// descended in name order. Matching is case-sensitive; an empty query
    /// matches every file on both counts. A start path that is malformed,
    /// missing or a file yields no hits.
    ///
    /// The walk visits every directory below `start`; its recursion is
    /// bounded by the depth limit enforced at creation.
    pub fn search(&self, query: &str, start: impl IntoTreePath) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        let Ok(start) = start.into_tree_path() else {
            return hits;
        };
        let Ok(directory) = self.directory_at(&start) else {
            log::trace!("search start {} is not a directory", start);
            return hits;
        };

        let mut walker = Walker {
            query,
            hits: &mut hits,
        };
        walker.visit(directory, &start);
        hits
    }

    /// [`Tree::search`] rendered as strings, content hits suffixed with
    /// ` (content match)`.
    pub fn search_strings(&self, query: &str, start: impl IntoTreePath) -> Vec<String> {
        self.search(query, start)
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

struct Walker<'q, 'h> {
    query: &'q str,
    hits: &'h mut Vec<SearchHit>,
}

impl Walker<'_, '_> {
    fn visit(&mut self, directory: &Directory, path: &TreePath) {
        for file in directory.files() {
            if file.name().contains(self.query) {
                self.hit(path.child(file.name()), MatchKind::Name);
            }
            if contains_bytes(file.content(), self.query.as_bytes()) {
                self.hit(path.child(file.name()), MatchKind::Content);
            }
        }

        for child in directory.directories() {
            self.visit(child, &path.child(child.name()));
        }
    }

    fn hit(&mut self, path: TreePath, kind: MatchKind) {
        self.hits.push(SearchHit { path, kind });
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
