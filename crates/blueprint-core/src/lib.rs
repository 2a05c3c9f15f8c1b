//! Core library for Blueprint: turning model build instructions into a
//! virtual project tree.
//!
//! A language model answers a build request with text containing instruction
//! blocks. This crate parses those blocks into typed [`Step`]s, applies them
//! to a virtual [`FileTree`], and keeps the cumulative state of each build in
//! a SQLite-backed session:
//!
//! ```text
//! response text ──parser──▶ steps ──materializer──▶ file tree ──mount──▶ sandbox
//! ```
//!
//! - [`parser`]: response text to ordered step drafts
//! - [`materializer`]: pending steps to tree changes, all-or-nothing
//! - [`session`]: session events as pure state transitions
//! - [`mount`]: tree to sandbox mount structure
//! - [`workspace`]: async API over the store, used by the CLI and MCP server
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use blueprint_core::{
//!     WorkspaceBuilder,
//!     params::{CreateSession, Id, IngestResponse},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = WorkspaceBuilder::new()
//!     .with_database_path(Some("blueprint.db"))
//!     .build()
//!     .await?;
//!
//! let session = workspace
//!     .create_session(&CreateSession {
//!         prompt: "a static landing page".to_string(),
//!         title: None,
//!     })
//!     .await?;
//!
//! let response = r#"<boltArtifact id="site" title="Landing Page">
//! <boltAction type="file" filePath="index.html">
//! <h1>Hello</h1>
//! </boltAction>
//! </boltArtifact>"#;
//!
//! workspace
//!     .ingest_response(&IngestResponse {
//!         session_id: session.id,
//!         response: response.to_string(),
//!         defer: false,
//!     })
//!     .await?;
//!
//! println!("{}", workspace.file_tree(&Id { id: session.id }).await?);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod materializer;
pub mod models;
pub mod mount;
pub mod params;
pub mod parser;
pub mod session;
pub mod tree;
pub mod workspace;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    BuildResult, CreateResult, DeleteResult, LocalDateTime, SessionSummaries, Steps, UpdateResult,
};
pub use error::{BuildError, Result};
pub use materializer::{
    MaterializeReport, Materialized, materialize, needs_materialize, validate_path,
};
pub use models::{
    ChatMessage, FileItem, Role, Session, SessionSummary, Step, StepAction, StepDraft,
    StepKind, StepStatus,
};
pub use mount::{MountEntry, MountTree};
pub use parser::parse_instructions;
pub use session::{SessionEvent, Transition};
pub use tree::FileTree;
pub use workspace::{Workspace, WorkspaceBuilder};
