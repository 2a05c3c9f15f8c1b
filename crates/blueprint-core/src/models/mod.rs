//! Data models for build sessions, steps and the virtual file tree.
//!
//! This module contains the core domain models of the blueprint pipeline.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures apart from
//! presentation logic.
//!
//! # Model Overview
//!
//! - [`Step`]: one build instruction with a lifecycle [`StepStatus`] and a
//!   closed [`StepAction`] describing what it does
//! - [`StepDraft`]: parser output, a step without id or status
//! - [`FileItem`]: one node of the virtual file tree
//! - [`Session`]: the step list, file tree and conversation of one build
//!
//! # Examples
//!
//! ```rust
//! use blueprint_core::models::{StepAction, StepDraft, StepKind, StepStatus};
//!
//! let draft = StepDraft {
//!     title: "Create src/App.tsx".to_string(),
//!     description: None,
//!     action: StepAction::CreateFile {
//!         path: "src/App.tsx".to_string(),
//!         code: "export default function App() {}".to_string(),
//!     },
//! };
//!
//! let step = draft.into_step(1);
//! assert_eq!(step.kind(), StepKind::CreateFile);
//! assert_eq!(step.status, StepStatus::Pending);
//! assert_eq!(step.path(), Some("src/App.tsx"));
//! ```

pub mod file;
pub mod session;
pub mod status;
pub mod step;


pub use file::FileItem;
pub use session::{ChatMessage, Role, Session, SessionSummary};
pub use status::StepStatus;
pub use step::{Step, StepAction, StepDraft, StepKind};
