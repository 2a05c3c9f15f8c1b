//! Collection wrapper types for displaying groups of domain objects.
//!
//! The wrappers only add formatting and an empty-collection message; the
//! vector inside is public.

use std::{fmt, ops::Index};

use crate::models::{SessionSummary, Step};

/// Newtype wrapper for displaying a list of session summaries.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::{display::SessionSummaries, models::SessionSummary};
/// use jiff::Timestamp;
///
/// let summary = SessionSummary {
///     id: 1,
///     title: "Todo App".to_string(),
///     prompt: "build a todo app".to_string(),
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     total_steps: 4,
///     completed_steps: 3,
/// };
///
/// let output = SessionSummaries(vec![summary]).to_string();
/// assert!(output.contains("## Todo App (ID: 1) (3/4)"));
/// ```
pub struct SessionSummaries(pub Vec<SessionSummary>);

impl SessionSummaries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SessionSummary> {
        self.0.iter()
    }
}

impl Index<usize> for SessionSummaries {
    type Output = SessionSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a SessionSummaries {
    type Item = &'a SessionSummary;
    type IntoIter = std::slice::Iter<'a, SessionSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SessionSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No sessions found.")
        } else {
            for summary in &self.0 {
                write!(f, "{summary}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a session's steps.
pub struct Steps(pub Vec<Step>);

impl Steps {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = Step;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for Steps {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps found.")
        } else {
            for step in &self.0 {
                write!(f, "{step}")?;
            }
            Ok(())
        }
    }
}
