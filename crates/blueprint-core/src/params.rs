//! Parameter structures for workspace operations.
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. Interfaces wrap or convert into
//! them:
//!
//! ```text
//! CLI args (clap) ──┐
//!                   ├──▶ core params ──▶ Workspace
//! MCP params (json) ┘
//! ```
//!
//! With the `schema` feature enabled every structure also derives
//! `schemars::JsonSchema`, which is what the MCP tool router needs.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::StepDraft;

/// Generic parameters for operations requiring just a session ID.
///
/// Used for get, delete, materialize, steps, tree and mount operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the session to operate on
    pub id: u64,
}

/// Parameters for creating a new build session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateSession {
    /// What the user wants built
    pub prompt: String,
    /// Optional title; taken from the first artifact when omitted
    #[serde(default)]
    pub title: Option<String>,
}

/// Parameters for loading the initial template response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LoadTemplate {
    pub session_id: u64,
    /// Template response text containing instruction blocks
    pub template: String,
    /// Hidden prompts that accompany the template in the conversation
    #[serde(default)]
    pub prompts: Vec<String>,
}

/// Parameters for ingesting a model response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct IngestResponse {
    pub session_id: u64,
    /// Raw response text from the model
    pub response: String,
    /// Append the parsed steps without materializing them
    #[serde(default)]
    pub defer: bool,
}

/// Parameters for recording a user follow-up message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SendMessage {
    pub session_id: u64,
    /// Message text; must not be blank
    pub content: String,
}

/// Parameters for appending steps directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AppendSteps {
    pub session_id: u64,
    /// Steps to append, in order
    pub steps: Vec<StepDraft>,
}

/// Parameters for marking a script step as started.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartScript {
    pub session_id: u64,
    /// ID of a pending RunScript step
    pub step_id: u64,
}

/// Parameters for reading one file from a session's tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ReadFile {
    pub session_id: u64,
    /// Full path of the file, e.g. `/src/App.tsx`
    pub path: String,
}

/// Parameters for parsing a response without touching any session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ParseResponse {
    /// Raw response text from the model
    pub response: String,
}
