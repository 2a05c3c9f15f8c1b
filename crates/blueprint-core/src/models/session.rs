//! Session model definition and related functionality.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Step, StepStatus};
use crate::tree::FileTree;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("Invalid message role: {s}")),
        }
    }
}

/// One turn of the conversation replayed to the language-model backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A build session: the cumulative step list, the file tree it produced and
/// the conversation that led there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique identifier for the session
    pub id: u64,

    /// Title, taken from the first artifact when not given explicitly
    pub title: String,

    /// The user prompt the session was started from
    pub prompt: String,

    /// Whether the initial template response has been loaded
    #[serde(default)]
    pub template_set: bool,

    /// Steps in append order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Materialized virtual file tree
    #[serde(default)]
    pub files: FileTree,

    /// Conversation history
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// Timestamp when the session was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the session was last committed (UTC)
    pub updated_at: Timestamp,
}

impl Session {
    /// Create an empty session stamped with the current time.
    pub fn new(id: u64, title: impl Into<String>, prompt: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            title: title.into(),
            prompt: prompt.into(),
            template_set: false,
            steps: Vec::new(),
            files: FileTree::default(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Id the next appended step receives.
    pub fn next_step_id(&self) -> u64 {
        self.steps.iter().map(|s| s.id).max().unwrap_or(0) + 1
    }

    pub fn step(&self, id: u64) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }
}

/// Summary information about a session with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session ID
    pub id: u64,
    /// Title of the session
    pub title: String,
    /// Prompt the session was started from
    pub prompt: String,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of completed steps
    pub completed_steps: u32,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            title: session.title.clone(),
            prompt: session.prompt.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            total_steps: session.steps.len() as u32,
            completed_steps: session.completed_steps() as u32,
        }
    }
}
