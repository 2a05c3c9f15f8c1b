//! Session CRUD operations and the transactional transition primitive.

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use super::{
    message_queries::{append_messages, load_messages},
    step_queries::{load_steps, save_steps},
    timestamp_column,
};
use crate::{
    error::{BuildError, DatabaseResultExt, Result},
    models::{Session, SessionSummary, Step},
    session::Transition,
    tree::FileTree,
};

const INSERT_SESSION_SQL: &str =
    "INSERT INTO sessions (title, prompt, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_SESSION_SQL: &str = "SELECT id, title, prompt, template_set, file_tree, created_at, updated_at FROM sessions WHERE id = ?1";
const UPDATE_SESSION_SQL: &str = "UPDATE sessions SET title = ?1, template_set = ?2, file_tree = ?3, updated_at = ?4 WHERE id = ?5";
const CHECK_SESSION_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM sessions WHERE id = ?1)";
const DELETE_SESSION_SQL: &str = "DELETE FROM sessions WHERE id = ?1";
const SELECT_SUMMARIES_SQL: &str = "SELECT id, title, prompt, created_at, updated_at, total_steps, completed_steps FROM session_summaries ORDER BY id DESC";

/// Load a full session (steps, messages and tree) through any connection,
/// including an open transaction.
fn load_session(conn: &Connection, id: u64) -> Result<Option<Session>> {
    let row = conn
        .query_row(SELECT_SESSION_SQL, params![id as i64], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, String>(4)?,
                timestamp_column(row, 5)?,
                timestamp_column(row, 6)?,
            ))
        })
        .optional()
        .db_context("Failed to query session")?;

    let Some((title, prompt, template_set, file_tree, created_at, updated_at)) = row else {
        return Ok(None);
    };

    let files: FileTree = serde_json::from_str(&file_tree)?;

    Ok(Some(Session {
        id,
        title,
        prompt,
        template_set,
        steps: load_steps(conn, id)?,
        files,
        messages: load_messages(conn, id)?,
        created_at,
        updated_at,
    }))
}

fn session_exists(conn: &Connection, id: u64) -> Result<bool> {
    conn.query_row(CHECK_SESSION_EXISTS_SQL, params![id as i64], |row| row.get(0))
        .db_context("Failed to check session existence")
}

impl super::Database {
    /// Creates a new, empty session.
    pub fn create_session(&mut self, title: &str, prompt: &str) -> Result<Session> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(INSERT_SESSION_SQL, params![title, prompt, &now_str, &now_str])
            .db_context("Failed to insert session")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        let mut session = Session::new(id, title, prompt);
        session.created_at = now;
        session.updated_at = now;
        Ok(session)
    }

    /// Retrieves a session with its steps, messages and file tree.
    pub fn get_session(&self, id: u64) -> Result<Option<Session>> {
        load_session(&self.connection, id)
    }

    /// Lists session summaries, newest first.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SUMMARIES_SQL)
            .db_context("Failed to prepare query")?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    title: row.get(1)?,
                    prompt: row.get(2)?,
                    created_at: timestamp_column(row, 3)?,
                    updated_at: timestamp_column(row, 4)?,
                    total_steps: row.get::<_, i64>(5)? as u32,
                    completed_steps: row.get::<_, i64>(6)? as u32,
                })
            })
            .db_context("Failed to query sessions")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read sessions")?;

        Ok(summaries)
    }

    /// Steps of a session in id order.
    pub fn get_steps(&self, session_id: u64) -> Result<Vec<Step>> {
        if !session_exists(&self.connection, session_id)? {
            return Err(BuildError::SessionNotFound { id: session_id });
        }
        load_steps(&self.connection, session_id)
    }

    /// Deletes a session together with its steps and messages.
    pub fn delete_session(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if !session_exists(&tx, id)? {
            return Err(BuildError::SessionNotFound { id });
        }

        tx.execute(DELETE_SESSION_SQL, params![id as i64])
            .db_context("Failed to delete session")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Load a session, transform it with `f` and save the result atomically.
    ///
    /// The transaction is IMMEDIATE, so concurrent writers (other processes
    /// included) queue behind it instead of interleaving. When `f` fails
    /// nothing is written.
    pub fn transition<F>(&mut self, id: u64, f: F) -> Result<Transition>
    where
        F: FnOnce(&Session) -> Result<Transition>,
    {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let current = load_session(&tx, id)?.ok_or(BuildError::SessionNotFound { id })?;

        let mut transition = f(&current)?;
        let next = &mut transition.session;
        next.updated_at = Timestamp::now();

        let file_tree = serde_json::to_string(&next.files)?;
        tx.execute(
            UPDATE_SESSION_SQL,
            params![
                next.title,
                next.template_set,
                file_tree,
                next.updated_at.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update session")?;

        save_steps(&tx, id, &current.steps, &next.steps)?;
        append_messages(&tx, id, current.messages.len(), &next.messages)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{db::Database, models::StepStatus, session::SessionEvent};

    const RESPONSE: &str = r#"<boltArtifact id="a" title="Hello">
<boltAction type="file" filePath="src/index.js">
console.log("hello");
</boltAction>
<boltAction type="shell">
node src/index.js
</boltAction>
</boltArtifact>"#;

    fn open() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn create_and_get_round_trip() {
        let (_dir, mut db) = open();
        let created = db.create_session("Demo", "make a demo").unwrap();

        let loaded = db.get_session(created.id).unwrap().expect("session");
        assert_eq!(loaded.title, "Demo");
        assert_eq!(loaded.prompt, "make a demo");
        assert!(loaded.steps.is_empty());
        assert!(loaded.files.is_empty());
        assert!(db.get_session(created.id + 1).unwrap().is_none());
    }

    #[test]
    fn transition_persists_steps_messages_and_tree() {
        let (_dir, mut db) = open();
        let id = db.create_session("", "hello world").unwrap().id;

        db.transition(id, |s| {
            s.apply(SessionEvent::AssistantResponded {
                response: RESPONSE.to_string(),
            })?
            .then(SessionEvent::Materialize)
        })
        .unwrap();

        let loaded = db.get_session(id).unwrap().unwrap();
        assert_eq!(loaded.steps.len(), 2);
        assert_eq!(loaded.steps[0].status, StepStatus::Completed);
        assert_eq!(loaded.steps[1].status, StepStatus::Pending);
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(
            loaded.files.find("/src/index.js").and_then(|n| n.content()),
            Some("console.log(\"hello\");")
        );
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[test]
    fn later_transition_saves_changed_and_new_steps() {
        let (_dir, mut db) = open();
        let id = db.create_session("", "p").unwrap().id;

        db.transition(id, |s| {
            s.apply(SessionEvent::AssistantResponded {
                response: RESPONSE.to_string(),
            })
        })
        .unwrap();
        db.transition(id, |s| {
            s.apply(SessionEvent::ScriptStarted { step_id: 2 })?
                .then(SessionEvent::AssistantResponded {
                    response: RESPONSE.to_string(),
                })
        })
        .unwrap();

        let steps = db.get_steps(id).unwrap();
        let statuses: Vec<_> = steps.iter().map(|s| (s.id, s.status)).collect();
        assert_eq!(
            statuses,
            [
                (1, StepStatus::Pending),
                (2, StepStatus::InProgress),
                (3, StepStatus::Pending),
                (4, StepStatus::Pending),
            ]
        );
    }

    #[test]
    fn failed_transition_writes_nothing() {
        let (_dir, mut db) = open();
        let id = db.create_session("", "p").unwrap().id;
        let before = db.get_session(id).unwrap().unwrap();

        let result = db.transition(id, |s| {
            s.apply(SessionEvent::AssistantResponded {
                response: RESPONSE.to_string(),
            })?
            .then(SessionEvent::UserMessage {
                content: String::new(),
            })
        });
        assert!(matches!(result, Err(BuildError::InvalidInput { .. })));

        assert_eq!(db.get_session(id).unwrap().unwrap(), before);
    }

    #[test]
    fn transition_on_missing_session_fails() {
        let (_dir, mut db) = open();
        let result = db.transition(42, |s| s.apply(SessionEvent::Materialize));
        assert!(matches!(result, Err(BuildError::SessionNotFound { id: 42 })));
    }

    #[test]
    fn summaries_count_completed_steps() {
        let (_dir, mut db) = open();
        let first = db.create_session("First", "one").unwrap().id;
        let second = db.create_session("Second", "two").unwrap().id;

        db.transition(second, |s| {
            s.apply(SessionEvent::AssistantResponded {
                response: RESPONSE.to_string(),
            })?
            .then(SessionEvent::Materialize)
        })
        .unwrap();

        let summaries = db.list_sessions().unwrap();
        assert_eq!(summaries.len(), 2);
        let second_summary = summaries.iter().find(|s| s.id == second).unwrap();
        assert_eq!(second_summary.total_steps, 2);
        assert_eq!(second_summary.completed_steps, 1);
        let first_summary = summaries.iter().find(|s| s.id == first).unwrap();
        assert_eq!(first_summary.total_steps, 0);
    }

    #[test]
    fn delete_cascades_to_steps() {
        let (_dir, mut db) = open();
        let id = db.create_session("", "p").unwrap().id;
        db.transition(id, |s| {
            s.apply(SessionEvent::AssistantResponded {
                response: RESPONSE.to_string(),
            })
        })
        .unwrap();

        db.delete_session(id).unwrap();
        assert!(db.get_session(id).unwrap().is_none());
        assert!(matches!(db.get_steps(id), Err(BuildError::SessionNotFound { .. })));
        assert!(matches!(
            db.delete_session(id),
            Err(BuildError::SessionNotFound { .. })
        ));
    }

    #[test]
    fn schema_version_is_stamped() {
        let (_dir, db) = open();
        assert_eq!(db.schema_version().unwrap(), crate::db::migrations::SCHEMA_VERSION);
    }
}
