//! The virtual file tree produced by materializing steps.
//!
//! [`FileTree`] owns the root level of the hierarchy. Nodes are only created
//! and updated by the [`crate::materializer`]; everything here is read-only
//! navigation plus the structural invariant check used by tests and the store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::FileItem;

/// Root level of the virtual file tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FileTree(pub Vec<FileItem>);

impl FileTree {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Root-level nodes in insertion order.
    pub fn items(&self) -> &[FileItem] {
        &self.0
    }

    /// Find a node by its full path (`/src/App.tsx`).
    ///
    /// A path without a leading slash is resolved from the root as well.
    pub fn find(&self, path: &str) -> Option<&FileItem> {
        let wanted = normalize(path);
        let mut level = self.0.as_slice();
        let mut prefix = String::new();

        for segment in wanted.trim_start_matches('/').split('/') {
            prefix.push('/');
            prefix.push_str(segment);
            let node = level.iter().find(|n| n.path() == prefix)?;
            if prefix == wanted {
                return Some(node);
            }
            level = node.children();
        }

        None
    }

    /// Selection contract for the display layer: selecting a path yields the
    /// node itself, nothing more.
    pub fn select(&self, path: &str) -> Option<&FileItem> {
        self.find(path)
    }

    /// Depth-first, pre-order iterator over every node.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.0.iter().rev().collect(),
        }
    }

    /// Number of file nodes in the tree.
    pub fn file_count(&self) -> usize {
        self.walk().filter(|n| !n.is_folder()).count()
    }

    /// Check the structural invariants of the hierarchy:
    /// - No two nodes share a `path`
    /// - Every node's `path` is its parent's `path` + `/` + `name`
    /// - Names are non-empty and contain no `/`
    ///
    /// Returns a list of violation messages in tree order; empty when valid.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        check_level(&self.0, "", &mut seen, &mut errors);
        errors
    }
}

impl From<Vec<FileItem>> for FileTree {
    fn from(items: Vec<FileItem>) -> Self {
        Self(items)
    }
}

/// Iterator returned by [`FileTree::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a FileItem>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a FileItem;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn check_level<'a>(
    level: &'a [FileItem],
    parent: &str,
    seen: &mut HashSet<&'a str>,
    errors: &mut Vec<String>,
) {
    for node in level {
        let name = node.name();
        if name.is_empty() || name.contains('/') {
            errors.push(format!("{}: invalid node name '{name}'", node.path()));
        }

        let expected = format!("{parent}/{name}");
        if node.path() != expected {
            errors.push(format!(
                "{}: path does not match parent, expected '{expected}'",
                node.path()
            ));
        }

        if !seen.insert(node.path()) {
            errors.push(format!("duplicate path '{}'", node.path()));
        }

        check_level(node.children(), node.path(), seen, errors);
    }
}
