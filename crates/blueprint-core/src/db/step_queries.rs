//! Step persistence.

use rusqlite::{Connection, params};

use super::parsed_column;
use crate::{
    error::{DatabaseResultExt, Result},
    models::{Step, StepAction, StepKind},
};

const SELECT_STEPS_SQL: &str = "SELECT step_id, title, description, kind, path, code, status FROM steps WHERE session_id = ?1 ORDER BY step_id";
const UPSERT_STEP_SQL: &str = "INSERT INTO steps (session_id, step_id, title, description, kind, path, code, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
     ON CONFLICT (session_id, step_id) DO UPDATE SET title = excluded.title, description = excluded.description, kind = excluded.kind, path = excluded.path, code = excluded.code, status = excluded.status";

fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
    let kind: StepKind = parsed_column(row, 3)?;
    let path: Option<String> = row.get(4)?;
    let code: Option<String> = row.get(5)?;

    let action = StepAction::from_parts(kind, path, code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("Missing payload for {} step", kind.as_str()).into(),
        )
    })?;

    Ok(Step {
        id: row.get::<_, i64>(0)? as u64,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parsed_column(row, 6)?,
        action,
    })
}

/// Load a session's steps in id order.
pub(super) fn load_steps(conn: &Connection, session_id: u64) -> Result<Vec<Step>> {
    let mut stmt = conn
        .prepare_cached(SELECT_STEPS_SQL)
        .db_context("Failed to prepare steps query")?;

    let steps = stmt
        .query_map(params![session_id as i64], build_step_from_row)
        .db_context("Failed to query steps")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .db_context("Failed to read steps")?;

    Ok(steps)
}

/// Insert new steps and update changed ones.
///
/// Steps are append-only with dense ids, so `previous[i]` is the stored
/// version of `steps[i]` whenever it exists.
pub(super) fn save_steps(
    conn: &Connection,
    session_id: u64,
    previous: &[Step],
    steps: &[Step],
) -> Result<()> {
    let mut stmt = conn
        .prepare_cached(UPSERT_STEP_SQL)
        .db_context("Failed to prepare step upsert")?;

    for (index, step) in steps.iter().enumerate() {
        if previous.get(index) == Some(step) {
            continue;
        }
        stmt.execute(params![
            session_id as i64,
            step.id as i64,
            step.title,
            step.description,
            step.kind().as_str(),
            step.path(),
            step.code(),
            step.status.as_str(),
        ])
        .db_context("Failed to save step")?;
    }

    Ok(())
}
