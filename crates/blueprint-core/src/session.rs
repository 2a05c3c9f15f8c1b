//! Session state machine.
//!
//! Every mutation of a [`Session`] is an event applied with
//! [`Session::apply`], which returns the next session without touching the
//! current one. The store commits the returned session as a unit, so a
//! rejected event or a failed materialization never leaves half-applied state.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::materializer::{MaterializeReport, materialize, validate_path};
use crate::models::{ChatMessage, Session, StepDraft, StepKind, StepStatus};
use crate::parser::{artifact_title, parse_instructions};

/// Something that happened to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The initial template response arrived together with its hidden prompts
    TemplateLoaded {
        template: String,
        prompts: Vec<String>,
    },
    /// The backend answered a chat turn
    AssistantResponded { response: String },
    /// The user sent a follow-up message
    UserMessage { content: String },
    /// Steps supplied directly rather than parsed from a response
    StepsAppended { steps: Vec<StepDraft> },
    /// Apply pending steps to the file tree
    Materialize,
    /// The execution environment picked up a script
    ScriptStarted { step_id: u64 },
}

/// Result of applying one or more events.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The session after the events
    pub session: Session,
    /// Present when a materialization ran
    pub report: Option<MaterializeReport>,
    /// Ids of steps appended by the events
    pub appended: Vec<u64>,
}

impl Transition {
    /// Apply a further event to the resulting session, keeping the appended
    /// ids and the latest materialize report.
    pub fn then(self, event: SessionEvent) -> Result<Transition> {
        let next = self.session.apply(event)?;
        let mut appended = self.appended;
        appended.extend(next.appended);

        Ok(Transition {
            session: next.session,
            report: next.report.or(self.report),
            appended,
        })
    }
}

impl Session {
    /// Apply an event, returning the resulting session.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidInput`] for a second template, a blank user
    ///   message, or a script start on a step that is not a pending script
    /// - [`BuildError::StepNotFound`] for an unknown step id
    /// - [`BuildError::InvalidPath`] when appended steps carry an unusable
    ///   path, or materialization hits one
    pub fn apply(&self, event: SessionEvent) -> Result<Transition> {
        let mut next = self.clone();
        let mut report = None;
        let mut appended = Vec::new();

        match event {
            SessionEvent::TemplateLoaded { template, prompts } => {
                if self.template_set {
                    return Err(BuildError::invalid_input("template")
                        .with_reason("a template is already loaded for this session"));
                }

                appended = next.append_drafts(parse_instructions(&template));
                next.messages
                    .extend(prompts.into_iter().map(ChatMessage::user));
                next.messages.push(ChatMessage::user(self.prompt.clone()));
                next.template_set = true;

                if next.title.trim().is_empty() {
                    if let Some(title) = artifact_title(&template) {
                        next.title = title;
                    }
                }
            }
            SessionEvent::AssistantResponded { response } => {
                appended = next.append_drafts(parse_instructions(&response));
                next.messages.push(ChatMessage::assistant(response));
            }
            SessionEvent::UserMessage { content } => {
                if content.trim().is_empty() {
                    return Err(BuildError::invalid_input("content").with_reason("cannot be empty"));
                }
                next.messages.push(ChatMessage::user(content));
            }
            SessionEvent::StepsAppended { steps } => {
                for draft in &steps {
                    if let Some(path) = draft.action.path() {
                        validate_path(path, draft.action.kind() == StepKind::CreateFolder)?;
                    }
                }
                appended = next.append_drafts(steps);
            }
            SessionEvent::Materialize => {
                let out = materialize(&self.steps, &self.files)?;
                next.steps = out.steps;
                next.files = out.files;
                report = Some(out.report);
            }
            SessionEvent::ScriptStarted { step_id } => {
                let step = next
                    .steps
                    .iter_mut()
                    .find(|s| s.id == step_id)
                    .ok_or(BuildError::StepNotFound {
                        session_id: self.id,
                        step_id,
                    })?;

                if step.kind() != StepKind::RunScript {
                    return Err(BuildError::invalid_input("step_id").with_reason(format!(
                        "step {step_id} is a {} step, not a script",
                        step.kind().label()
                    )));
                }
                if step.status != StepStatus::Pending {
                    return Err(BuildError::invalid_input("step_id").with_reason(format!(
                        "script {step_id} is already {}",
                        step.status.as_str()
                    )));
                }
                step.status = StepStatus::InProgress;
            }
        }

        Ok(Transition {
            session: next,
            report,
            appended,
        })
    }

    fn append_drafts(&mut self, drafts: Vec<StepDraft>) -> Vec<u64> {
        let first = self.next_step_id();
        let ids: Vec<u64> = (first..).take(drafts.len()).collect();
        self.steps.extend(
            drafts
                .into_iter()
                .zip(ids.iter())
                .map(|(draft, id)| draft.into_step(*id)),
        );
        ids
    }
}
