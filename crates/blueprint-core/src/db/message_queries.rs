//! Conversation history persistence.

use rusqlite::{Connection, params};

use super::parsed_column;
use crate::{
    error::{DatabaseResultExt, Result},
    models::ChatMessage,
};

const SELECT_MESSAGES_SQL: &str =
    "SELECT role, content FROM messages WHERE session_id = ?1 ORDER BY position";
const INSERT_MESSAGE_SQL: &str =
    "INSERT OR IGNORE INTO messages (session_id, position, role, content) VALUES (?1, ?2, ?3, ?4)";

pub(super) fn load_messages(conn: &Connection, session_id: u64) -> Result<Vec<ChatMessage>> {
    let mut stmt = conn
        .prepare_cached(SELECT_MESSAGES_SQL)
        .db_context("Failed to prepare messages query")?;

    let messages = stmt
        .query_map(params![session_id as i64], |row| {
            Ok(ChatMessage {
                role: parsed_column(row, 0)?,
                content: row.get(1)?,
            })
        })
        .db_context("Failed to query messages")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read messages")?;

    Ok(messages)
}

/// Append the messages past `from`; history is append-only.
pub(super) fn append_messages(
    conn: &Connection,
    session_id: u64,
    from: usize,
    messages: &[ChatMessage],
) -> Result<()> {
    let mut stmt = conn
        .prepare_cached(INSERT_MESSAGE_SQL)
        .db_context("Failed to prepare message insert")?;

    for (position, message) in messages.iter().enumerate().skip(from) {
        stmt.execute(params![
            session_id as i64,
            position as i64,
            message.role.as_str(),
            message.content,
        ])
        .db_context("Failed to save message")?;
    }

    Ok(())
}
