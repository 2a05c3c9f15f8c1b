//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    models::{Session, Step},
    session::Transition,
};

/// Wrapper for displaying a newly created resource.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::{display::CreateResult, models::Session};
///
/// let result = CreateResult::new(Session::new(3, "Landing page", "a landing page"));
/// assert!(result.to_string().starts_with("Created session with ID: 3"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Session> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created session with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper for displaying a deleted resource.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Session> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted session '{}' (ID: {})",
            self.resource.title, self.resource.id
        )
    }
}

/// Wrapper for displaying an updated step together with a short note.
pub struct UpdateResult<T> {
    pub resource: T,
    pub note: String,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T, note: impl Into<String>) -> Self {
        Self {
            resource,
            note: note.into(),
        }
    }
}

impl fmt::Display for UpdateResult<Step> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.note)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper for displaying the outcome of a session transition: appended
/// steps and, when one ran, the materialization report.
pub struct BuildResult(pub Transition);

impl BuildResult {
    pub fn session(&self) -> &Session {
        &self.0.session
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Transition {
            session,
            report,
            appended,
        } = &self.0;

        writeln!(f, "Session {}: {}", session.id, session.title)?;
        writeln!(f)?;

        if appended.is_empty() {
            writeln!(f, "No new steps.")?;
        } else {
            writeln!(f, "Appended {} step(s):", appended.len())?;
            writeln!(f)?;
            for step in session.steps.iter().filter(|s| appended.contains(&s.id)) {
                writeln!(f, "- {}. {} ({})", step.id, step.title, step.status.with_icon())?;
            }
        }

        if let Some(report) = report {
            writeln!(f)?;
            write!(f, "{report}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionEvent;

    #[test]
    fn build_result_lists_appended_steps_and_report() {
        let response = "<boltAction type=\"file\" filePath=\"a.txt\">a</boltAction>";
        let transition = Session::new(1, "Demo", "demo")
            .apply(SessionEvent::AssistantResponded {
                response: response.to_string(),
            })
            .and_then(|t| t.then(SessionEvent::Materialize))
            .unwrap();

        let output = BuildResult(transition).to_string();
        assert!(output.contains("Appended 1 step(s):"));
        assert!(output.contains("- 1. Create a.txt (✓ Completed)"));
        assert!(output.contains("Materialized 1 step(s)."));
    }

    #[test]
    fn delete_result_names_the_session() {
        let output = DeleteResult::new(Session::new(9, "Old", "p")).to_string();
        assert_eq!(output, "Deleted session 'Old' (ID: 9)\n");
    }
}
