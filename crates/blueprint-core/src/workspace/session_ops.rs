//! Session lifecycle operations for the Workspace.

use log::info;

use super::Workspace;
use crate::{
    display::SessionSummaries,
    error::{BuildError, Result},
    models::Session,
    params::{CreateSession, Id},
};

impl Workspace {
    /// Creates a new, empty session for a user prompt.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidInput` when the prompt is blank.
    pub async fn create_session(&self, params: &CreateSession) -> Result<Session> {
        if params.prompt.trim().is_empty() {
            return Err(BuildError::invalid_input("prompt").with_reason("cannot be empty"));
        }

        let title = params.title.clone().unwrap_or_default();
        let prompt = params.prompt.clone();

        let session = self
            .with_db(move |db| db.create_session(title.trim(), &prompt))
            .await?;
        info!("created session {}", session.id);
        Ok(session)
    }

    /// Retrieves a session with its steps, messages and file tree.
    pub async fn get_session(&self, params: &Id) -> Result<Option<Session>> {
        let id = params.id;
        self.with_db(move |db| db.get_session(id)).await
    }

    /// Lists all sessions with step progress, newest first.
    pub async fn list_sessions(&self) -> Result<SessionSummaries> {
        self.with_db(|db| db.list_sessions())
            .await
            .map(SessionSummaries)
    }

    /// Permanently deletes a session and returns it as it was.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::SessionNotFound` when no such session exists.
    pub async fn delete_session(&self, params: &Id) -> Result<Session> {
        let id = params.id;
        let _guard = self.write_lock.lock().await;

        let session = self
            .with_db(move |db| {
                let session = db
                    .get_session(id)?
                    .ok_or(BuildError::SessionNotFound { id })?;
                db.delete_session(id)?;
                Ok(session)
            })
            .await?;
        info!("deleted session {id}");
        Ok(session)
    }
}
