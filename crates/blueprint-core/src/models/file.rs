//! Virtual file tree nodes.

use serde::{Deserialize, Serialize};

/// One node of the virtual file tree.
///
/// `path` is the full slash-delimited path from the tree root (`/src/App.tsx`)
/// and always equals the parent's path plus `/` plus `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileItem {
    File {
        name: String,
        path: String,
        #[serde(default)]
        content: String,
    },
    Folder {
        name: String,
        path: String,
        #[serde(default)]
        children: Vec<FileItem>,
    },
}

impl FileItem {
    /// Create a file node.
    pub fn file(name: impl Into<String>, path: impl Into<String>, content: impl Into<String>) -> Self {
        FileItem::File {
            name: name.into(),
            path: path.into(),
            content: content.into(),
        }
    }

    /// Create an empty folder node.
    pub fn folder(name: impl Into<String>, path: impl Into<String>) -> Self {
        FileItem::Folder {
            name: name.into(),
            path: path.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FileItem::File { name, .. } | FileItem::Folder { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileItem::File { path, .. } | FileItem::Folder { path, .. } => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FileItem::Folder { .. })
    }

    /// File contents; `None` for folders.
    pub fn content(&self) -> Option<&str> {
        match self {
            FileItem::File { content, .. } => Some(content),
            FileItem::Folder { .. } => None,
        }
    }

    /// Child nodes; empty for files.
    pub fn children(&self) -> &[FileItem] {
        match self {
            FileItem::Folder { children, .. } => children,
            FileItem::File { .. } => &[],
        }
    }
}
