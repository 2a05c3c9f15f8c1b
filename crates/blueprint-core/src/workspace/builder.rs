//! Builder for creating and configuring Workspace instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Workspace;
use crate::{
    db::Database,
    error::{BuildError, Result},
};

/// Builder for creating and configuring Workspace instances.
#[derive(Debug, Clone)]
pub struct WorkspaceBuilder {
    database_path: Option<PathBuf>,
    auto_materialize: bool,
}

impl WorkspaceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            auto_materialize: true,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/blueprint/blueprint.db` or
    /// `~/.local/share/blueprint/blueprint.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Whether loading a template, ingesting a response or appending steps
    /// materializes the new steps in the same commit. Enabled by default.
    pub fn with_auto_materialize(mut self, enabled: bool) -> Self {
        self.auto_materialize = enabled;
        self
    }

    /// Builds the configured workspace, creating the database if needed.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::XdgDirectory` if no default location can be found
    /// Returns `BuildError::FileSystem` if the database directory cannot be created
    /// Returns `BuildError::Database` if database initialization fails
    pub async fn build(self) -> Result<Workspace> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BuildError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || Database::new(&init_path).map(drop))
            .await
            .map_err(|e| BuildError::Configuration {
                message: format!("Task join error: {e}"),
            })??;

        log::debug!("workspace database at {}", db_path.display());

        Ok(Workspace::new(db_path, self.auto_materialize))
    }

    /// Returns the default database path following the XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("blueprint")
            .place_data_file("blueprint.db")
            .map_err(|e| BuildError::XdgDirectory(e.to_string()))
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
