//! High-level async API over the session store.
//!
//! [`Workspace`] is what the CLI and the MCP server talk to. Every call opens
//! the SQLite database on tokio's blocking pool, so callers never block the
//! runtime:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │  CLI / MCP   │───▶│    Workspace     │───▶│   Database   │
//! │              │    │ (async, queued)  │    │ (transition) │
//! └──────────────┘    └──────────────────┘    └──────────────┘
//! ```
//!
//! Mutations go through [`Database::transition`] behind a FIFO mutex, which
//! gives the single-flight guarantee materialization needs: two responses
//! ingested at once are applied one after the other, never interleaved.
//!
//! ## Submodules
//!
//! - [`builder`]: [`WorkspaceBuilder`] and the default database location
//! - `session_ops`: create, get, list and delete sessions
//! - `build_ops`: templates, responses, messages, materialization, scripts
//! - `file_ops`: read-only views of the tree (files, mount structure)
//!
//! # Examples
//!
//! ```rust,no_run
//! use blueprint_core::{WorkspaceBuilder, params::{CreateSession, IngestResponse}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = WorkspaceBuilder::new()
//!     .with_database_path(Some("/tmp/blueprint.db"))
//!     .build()
//!     .await?;
//!
//! let session = workspace
//!     .create_session(&CreateSession {
//!         prompt: "a counter app".to_string(),
//!         title: None,
//!     })
//!     .await?;
//!
//! let result = workspace
//!     .ingest_response(&IngestResponse {
//!         session_id: session.id,
//!         response: "<boltAction type=\"file\" filePath=\"index.js\">let n = 0;</boltAction>".to_string(),
//!         defer: false,
//!     })
//!     .await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::{sync::Mutex, task};

use crate::{
    db::Database,
    error::{BuildError, Result},
    models::Session,
    session::Transition,
};

pub mod builder;
mod build_ops;
mod file_ops;
mod session_ops;

#[cfg(test)]
mod tests;

pub use builder::WorkspaceBuilder;

/// Main interface for managing build sessions.
pub struct Workspace {
    pub(crate) db_path: PathBuf,
    pub(crate) auto_materialize: bool,
    write_lock: Mutex<()>,
}

impl Workspace {
    pub(crate) fn new(db_path: PathBuf, auto_materialize: bool) -> Self {
        Self {
            db_path,
            auto_materialize,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the SQLite database backing this workspace.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Run `f` against a fresh connection on the blocking pool.
    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| BuildError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Apply a session transition, queued behind any other mutation.
    async fn commit<F>(&self, session_id: u64, f: F) -> Result<Transition>
    where
        F: FnOnce(&Session) -> Result<Transition> + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        self.with_db(move |db| db.transition(session_id, f)).await
    }

    /// Load a session or fail with `SessionNotFound`.
    async fn require_session(&self, session_id: u64) -> Result<Session> {
        self.with_db(move |db| db.get_session(session_id))
            .await?
            .ok_or(BuildError::SessionNotFound { id: session_id })
    }
}
