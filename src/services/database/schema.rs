use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_tasks_table(conn)?;
    run_task_migrations(conn)?;
    Ok(())
}

/// Dates are stored as `YYYY-MM-DD` and times as `HH:MM`; NULL means the field is implicit.
fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL DEFAULT '',
            start_date TEXT,
            start_time TEXT,
            end_date TEXT,
            end_time TEXT,
            deadline TEXT,
            is_future INTEGER NOT NULL DEFAULT 0,
            color TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create tasks table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_start_date ON tasks(start_date)",
        [],
    )
    .context("Failed to create start_date index")?;

    Ok(())
}

fn run_task_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "tasks",
        "color",
        "ALTER TABLE tasks ADD COLUMN color TEXT",
    )?;
    Ok(())
}
