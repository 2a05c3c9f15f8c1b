//! Read-only views of a session's file tree.

use std::collections::BTreeMap;

use super::Workspace;
use crate::{
    display::Steps,
    error::{BuildError, Result},
    models::FileItem,
    mount::{MountTree, mount_structure, project_files},
    params::{Id, ReadFile},
    tree::FileTree,
};

impl Workspace {
    /// Steps of a session in append order.
    pub async fn get_steps(&self, params: &Id) -> Result<Steps> {
        let id = params.id;
        self.with_db(move |db| db.get_steps(id)).await.map(Steps)
    }

    /// The materialized file tree of a session.
    pub async fn file_tree(&self, params: &Id) -> Result<FileTree> {
        Ok(self.require_session(params.id).await?.files)
    }

    /// Contents of one file in a session's tree.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidPath` when the path does not name a file.
    pub async fn read_file(&self, params: &ReadFile) -> Result<String> {
        let files = self.require_session(params.session_id).await?.files;

        match files.select(&params.path) {
            Some(FileItem::File { content, .. }) => Ok(content.clone()),
            Some(FileItem::Folder { .. }) => {
                Err(BuildError::invalid_path(&params.path, "is a folder"))
            }
            None => Err(BuildError::invalid_path(&params.path, "no such file")),
        }
    }

    /// The session's tree converted to the sandbox mount structure.
    pub async fn mount_structure(&self, params: &Id) -> Result<MountTree> {
        let files = self.file_tree(params).await?;
        Ok(mount_structure(&files))
    }

    /// Flat map of non-empty files, keyed by path relative to the root.
    pub async fn project_files(&self, params: &Id) -> Result<BTreeMap<String, String>> {
        let files = self.file_tree(params).await?;
        Ok(project_files(&files))
    }
}
