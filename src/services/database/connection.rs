use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// How long a write waits on a lock held by another process before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Owns the SQLite connection behind the task store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens or creates the database file at `path`.
    ///
    /// `":memory:"` gives a private in-memory database, which the tests use.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set busy timeout")?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the tasks table and adds columns missing from older files.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }
}
