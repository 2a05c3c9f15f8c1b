//! Conversion of the virtual file tree into sandbox mount formats.
//!
//! The execution sandbox mounts a nested map keyed by entry name:
//!
//! ```json
//! {
//!   "src": { "directory": { "App.tsx": { "file": { "contents": "..." } } } },
//!   "package.json": { "file": { "contents": "{}" } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::FileItem;
use crate::tree::FileTree;

/// Nested mount map, keyed by entry name.
pub type MountTree = BTreeMap<String, MountEntry>;

/// One entry of a [`MountTree`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    Directory(MountTree),
    File { contents: String },
}

/// Convert the whole tree to the sandbox mount structure.
///
/// Every folder and file is included at full depth; file contents are copied
/// exactly, empty files included.
pub fn mount_structure(files: &FileTree) -> MountTree {
    convert_level(files.items())
}

fn convert_level(level: &[FileItem]) -> MountTree {
    level
        .iter()
        .map(|node| {
            let entry = match node {
                FileItem::Folder { children, .. } => MountEntry::Directory(convert_level(children)),
                FileItem::File { content, .. } => MountEntry::File {
                    contents: content.clone(),
                },
            };
            (node.name().to_string(), entry)
        })
        .collect()
}

/// Flat `relative/path -> content` map of every non-empty file, the shape
/// embedded previews consume.
pub fn project_files(files: &FileTree) -> BTreeMap<String, String> {
    files
        .walk()
        .filter_map(|node| match node {
            FileItem::File { path, content, .. } if !content.is_empty() => Some((
                path.trim_start_matches('/').to_string(),
                content.clone(),
            )),
            _ => None,
        })
        .collect()
}
