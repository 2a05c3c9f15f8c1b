//! Display formatting and result wrapper types.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and operation outcomes get newtype wrappers so each interface prints the
//! same markdown:
//!
//! ```text
//! Session / Step / FileTree ──▶ wrappers (Steps, BuildResult, ...) ──▶ markdown
//! ```
//!
//! - [`collections`]: [`SessionSummaries`], [`Steps`]
//! - [`results`]: [`CreateResult`], [`DeleteResult`], [`UpdateResult`], [`BuildResult`]
//! - [`datetime`]: [`LocalDateTime`]
//!
//! # Examples
//!
//! ```rust
//! use blueprint_core::display::Steps;
//!
//! assert_eq!(Steps(Vec::new()).to_string(), "No steps found.\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{SessionSummaries, Steps};
pub use datetime::LocalDateTime;
pub use results::{BuildResult, CreateResult, DeleteResult, UpdateResult};
