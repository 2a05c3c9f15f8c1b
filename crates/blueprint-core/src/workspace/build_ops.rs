//! Build operations: feeding responses in and turning steps into files.

use log::{debug, info};

use super::Workspace;
use crate::{
    display::BuildResult,
    error::{BuildError, Result},
    materializer::needs_materialize,
    models::{Step, StepDraft},
    params::{AppendSteps, Id, IngestResponse, LoadTemplate, ParseResponse, SendMessage, StartScript},
    parser::parse_instructions,
    session::SessionEvent,
};

impl Workspace {
    /// Loads the initial template response for a session.
    ///
    /// The template's instruction blocks become the first steps, and the
    /// accompanying prompts plus the session prompt open the conversation.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidInput` if a template was already loaded.
    pub async fn load_template(&self, params: &LoadTemplate) -> Result<BuildResult> {
        let event = SessionEvent::TemplateLoaded {
            template: params.template.clone(),
            prompts: params.prompts.clone(),
        };
        self.apply_event(params.session_id, event, self.auto_materialize)
            .await
    }

    /// Parses a model response into the session's step list.
    ///
    /// A response without instruction blocks is recorded in the conversation
    /// and leaves the steps unchanged.
    pub async fn ingest_response(&self, params: &IngestResponse) -> Result<BuildResult> {
        let event = SessionEvent::AssistantResponded {
            response: params.response.clone(),
        };
        self.apply_event(
            params.session_id,
            event,
            self.auto_materialize && !params.defer,
        )
        .await
    }

    /// Records a user follow-up message.
    pub async fn send_message(&self, params: &SendMessage) -> Result<BuildResult> {
        let event = SessionEvent::UserMessage {
            content: params.content.clone(),
        };
        self.apply_event(params.session_id, event, false).await
    }

    /// Appends steps supplied directly rather than parsed from a response.
    pub async fn append_steps(&self, params: &AppendSteps) -> Result<BuildResult> {
        let event = SessionEvent::StepsAppended {
            steps: params.steps.clone(),
        };
        self.apply_event(params.session_id, event, self.auto_materialize)
            .await
    }

    /// Applies every pending step of a session to its file tree.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidPath` if any pending step has an unusable
    /// path; in that case nothing is applied.
    ///
    /// A session with no pending file or folder steps is not written, so its
    /// `updated_at` stays as it was.
    pub async fn materialize(&self, params: &Id) -> Result<BuildResult> {
        let session = self.require_session(params.id).await?;
        if !needs_materialize(&session.steps) {
            debug!("session {}: nothing to materialize", params.id);
            return session.apply(SessionEvent::Materialize).map(BuildResult);
        }

        let transition = self
            .commit(params.id, |session| session.apply(SessionEvent::Materialize))
            .await?;
        if let Some(report) = &transition.report {
            info!(
                "session {}: materialized {} step(s)",
                params.id,
                report.completed.len()
            );
        }
        Ok(BuildResult(transition))
    }

    /// Marks a pending script step as handed to the execution environment.
    pub async fn start_script(&self, params: &StartScript) -> Result<Step> {
        let step_id = params.step_id;
        let transition = self
            .commit(params.session_id, move |session| {
                session.apply(SessionEvent::ScriptStarted { step_id })
            })
            .await?;

        info!("session {}: script {step_id} started", params.session_id);
        transition
            .session
            .steps
            .into_iter()
            .find(|s| s.id == step_id)
            .ok_or(BuildError::StepNotFound {
                session_id: params.session_id,
                step_id,
            })
    }

    /// Parses a response without touching any session.
    pub fn parse_response(&self, params: &ParseResponse) -> Vec<StepDraft> {
        parse_instructions(&params.response)
    }

    async fn apply_event(
        &self,
        session_id: u64,
        event: SessionEvent,
        materialize: bool,
    ) -> Result<BuildResult> {
        let transition = self
            .commit(session_id, move |session| {
                let transition = session.apply(event)?;
                if materialize {
                    transition.then(SessionEvent::Materialize)
                } else {
                    Ok(transition)
                }
            })
            .await?;

        debug!(
            "session {session_id}: appended {} step(s)",
            transition.appended.len()
        );
        Ok(BuildResult(transition))
    }
}
