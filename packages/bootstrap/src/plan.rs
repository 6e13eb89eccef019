//! Declarative seed plans.
//!
//! A plan is a list of creation calls and permission grants replayed once
//! against a tree before it serves queries. Plans are JSON documents like:
//! ```json
//! {
//!   "directories": [{"parent": "/", "name": "docs"}],
//!   "files": [{"parent": "/docs", "name": "report.txt"}],
//!   "contents": [{"path": "/docs/report.txt", "content": "final draft"}],
//!   "grants": [{"path": "/docs", "principal": "alice", "capabilities": ["write"]}]
//! }
//! ```
//! Every section is optional. Parents are never created implicitly: each
//! intermediate directory needs its own entry, listed before its children.

use std::fs;
use std::path::Path;

use acltree_core::{NodeKind, Tree, TreeConfig, TreePath};
use serde::{Deserialize, Serialize};

use crate::error::{BootstrapError, Result};

/// A node to create: `name` inside the directory at `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedNode {
    pub parent: TreePath,
    pub name: String,
}

/// Initial payload of a seeded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedContent {
    pub path: TreePath,
    pub content: String,
}

/// Capabilities granted to one principal at one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedGrant {
    pub path: TreePath,
    pub principal: String,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedPlan {
    pub directories: Vec<SeedNode>,
    pub files: Vec<SeedNode>,
    pub contents: Vec<SeedContent>,
    pub grants: Vec<SeedGrant>,
}

/// Counts of the steps a plan carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub directories: usize,
    pub files: usize,
    pub contents: usize,
    pub grants: usize,
}

impl SeedPlan {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn directory(mut self, parent: TreePath, name: &str) -> Self {
        self.directories.push(SeedNode {
            parent,
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn file(mut self, parent: TreePath, name: &str) -> Self {
        self.files.push(SeedNode {
            parent,
            name: name.to_string(),
        });
        self
    }

    #[must_use]
    pub fn content(mut self, path: TreePath, content: &str) -> Self {
        self.contents.push(SeedContent {
            path,
            content: content.to_string(),
        });
        self
    }

    #[must_use]
    pub fn grant(mut self, path: TreePath, principal: &str, capabilities: &[&str]) -> Self {
        self.grants.push(SeedGrant {
            path,
            principal: principal.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a plan from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading seed plan {}...", path.display());
        let text = fs::read_to_string(path).map_err(|source| BootstrapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replay the plan: directories, then files, then contents, then grants,
    /// each in listed order. Stops at the first rejected step; steps already
    /// carried out stay in the tree.
    pub fn apply(&self, tree: &mut Tree) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        for node in &self.directories {
            tree.create(&node.parent, &node.name, NodeKind::Directory)
                .map_err(|source| {
                    step(
                        format!("directory {:?} in {}", node.name, node.parent),
                        source,
                    )
                })?;
            report.directories += 1;
        }
        for node in &self.files {
            tree.create(&node.parent, &node.name, NodeKind::File)
                .map_err(|source| {
                    step(format!("file {:?} in {}", node.name, node.parent), source)
                })?;
            report.files += 1;
        }
        for seed in &self.contents {
            tree.set_content(&seed.path, seed.content.clone())
                .map_err(|source| step(format!("content of {}", seed.path), source))?;
            report.contents += 1;
        }
        for grant in &self.grants {
            tree.grant_permissions(&grant.path, &grant.principal, &grant.capabilities)
                .map_err(|source| {
                    step(
                        format!("grant to {:?} at {}", grant.principal, grant.path),
                        source,
                    )
                })?;
            report.grants += 1;
        }

        log::info!(
            "seeded {} directories, {} files, {} contents, {} grants",
            report.directories,
            report.files,
            report.contents,
            report.grants
        );
        Ok(report)
    }

    /// A fresh tree with this plan applied.
    pub fn build(&self, config: TreeConfig) -> Result<Tree> {
        let mut tree = Tree::with_config(config);
        self.apply(&mut tree)?;
        Ok(tree)
    }
}

fn step(step: String, source: acltree_core::Error) -> BootstrapError {
    BootstrapError::Step { step, source }
}
