//! Step model definition and related functionality.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::StepStatus;

/// Payload-free tag identifying what a step does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    CreateFile,
    CreateFolder,
    RunScript,
    EditFile,
}

impl StepKind {
    /// Convert to the database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::CreateFile => "create_file",
            StepKind::CreateFolder => "create_folder",
            StepKind::RunScript => "run_script",
            StepKind::EditFile => "edit_file",
        }
    }

    /// Short human label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::CreateFile => "file",
            StepKind::CreateFolder => "folder",
            StepKind::RunScript => "script",
            StepKind::EditFile => "edit",
        }
    }
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_file" => Ok(StepKind::CreateFile),
            "create_folder" => Ok(StepKind::CreateFolder),
            "run_script" => Ok(StepKind::RunScript),
            "edit_file" => Ok(StepKind::EditFile),
            _ => Err(format!("Invalid step kind: {s}")),
        }
    }
}

/// What a step does, carrying exactly the payload its kind requires.
///
/// Serialized flat into the owning record with a `type` tag, so a step reads
/// as `{"type": "create_file", "path": "...", "code": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Write a file with the given full contents
    CreateFile { path: String, code: String },
    /// Ensure a folder exists
    CreateFolder { path: String },
    /// Shell command for the execution environment
    RunScript { code: String },
    /// Replace a file's full contents
    EditFile { path: String, code: String },
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::CreateFile { .. } => StepKind::CreateFile,
            StepAction::CreateFolder { .. } => StepKind::CreateFolder,
            StepAction::RunScript { .. } => StepKind::RunScript,
            StepAction::EditFile { .. } => StepKind::EditFile,
        }
    }

    /// Virtual path targeted by the step, if its kind has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            StepAction::CreateFile { path, .. }
            | StepAction::CreateFolder { path }
            | StepAction::EditFile { path, .. } => Some(path),
            StepAction::RunScript { .. } => None,
        }
    }

    /// File contents or command text, if its kind has one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StepAction::CreateFile { code, .. }
            | StepAction::RunScript { code }
            | StepAction::EditFile { code, .. } => Some(code),
            StepAction::CreateFolder { .. } => None,
        }
    }

    /// Rebuild an action from its stored columns.
    ///
    /// Returns `None` when a column required by `kind` is missing.
    pub fn from_parts(kind: StepKind, path: Option<String>, code: Option<String>) -> Option<Self> {
        match kind {
            StepKind::CreateFile => Some(StepAction::CreateFile {
                path: path?,
                code: code.unwrap_or_default(),
            }),
            StepKind::CreateFolder => Some(StepAction::CreateFolder { path: path? }),
            StepKind::RunScript => Some(StepAction::RunScript { code: code? }),
            StepKind::EditFile => Some(StepAction::EditFile {
                path: path?,
                code: code.unwrap_or_default(),
            }),
        }
    }
}

/// A step as produced by the instruction parser, before it joins a session.
///
/// Drafts carry no id and no status: both are assigned when the draft is
/// appended to a session's step list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct StepDraft {
    /// Short human-readable label
    pub title: String,

    /// Optional longer explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// What the step does
    #[serde(flatten)]
    pub action: StepAction,
}

impl StepDraft {
    /// Promote the draft to a pending step with the given id.
    pub fn into_step(self, id: u64) -> Step {
        Step {
            id,
            title: self.title,
            description: self.description,
            status: StepStatus::Pending,
            action: self.action,
        }
    }
}

/// One build instruction within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Identifier assigned in append order, unique within the session
    pub id: u64,

    /// Short human-readable label
    pub title: String,

    /// Optional longer explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: StepStatus,

    /// What the step does
    #[serde(flatten)]
    pub action: StepAction,
}

impl Step {
    pub fn kind(&self) -> StepKind {
        self.action.kind()
    }

    pub fn path(&self) -> Option<&str> {
        self.action.path()
    }

    pub fn code(&self) -> Option<&str> {
        self.action.code()
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }
}
