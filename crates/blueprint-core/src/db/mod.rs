//! Database operations and SQLite management for build sessions.
//!
//! This module provides the low-level store behind the workspace. It handles
//! SQLite connections and schema management, and exposes session, step and
//! message queries. Every session mutation goes through
//! [`Database::transition`], which loads, transforms and saves a session inside
//! one IMMEDIATE transaction.

use std::{path::Path, time::Duration};

use jiff::Timestamp;
use rusqlite::{Connection, types::Type};

use crate::error::{DatabaseResultExt, Result};

mod message_queries;
pub mod migrations;
pub mod session_queries;
mod step_queries;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

/// Read an RFC 3339 timestamp column.
fn timestamp_column(row: &rusqlite::Row, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Parse a text column through `FromStr`, reporting failures as conversion
/// errors on that column.
fn parsed_column<T>(row: &rusqlite::Row, index: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(index)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, e.into()))
}
