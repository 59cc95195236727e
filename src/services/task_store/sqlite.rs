use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension, Row};

use crate::models::task::{Task, TaskId, TaskPatch};
use crate::services::database::Database;

use super::TaskStore;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

fn time_to_sql(time: Option<NaiveTime>) -> Option<String> {
    time.map(|t| t.format(TIME_FORMAT).to_string())
}

fn parse_column<T>(
    raw: Option<String>,
    index: usize,
    parse: impl Fn(&str) -> chrono::ParseResult<T>,
) -> rusqlite::Result<Option<T>> {
    raw.map(|value| {
        parse(&value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
        })
    })
    .transpose()
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let date = |s: &str| NaiveDate::parse_from_str(s, DATE_FORMAT);
    let time = |s: &str| NaiveTime::parse_from_str(s, TIME_FORMAT);

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        start_date: parse_column(row.get(2)?, 2, date)?,
        start_time: parse_column(row.get(3)?, 3, time)?,
        end_date: parse_column(row.get(4)?, 4, date)?,
        end_time: parse_column(row.get(5)?, 5, time)?,
        deadline: parse_column(row.get(6)?, 6, date)?,
        is_future: row.get::<_, i32>(7)? != 0,
        color: row.get(8)?,
    })
}

/// Task store backed by the `tasks` table.
pub struct SqliteTaskStore {
    db: Database,
}

impl SqliteTaskStore {
    /// Opens the database at `path` and makes sure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Insert a task, returning it with the id assigned by SQLite.
    pub fn insert(&self, mut task: Task) -> Result<Task> {
        self.db
            .connection()
            .execute(
                "INSERT INTO tasks (
                    title, start_date, start_time, end_date, end_time, deadline, is_future, color
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    task.title,
                    date_to_sql(task.start_date),
                    time_to_sql(task.start_time),
                    date_to_sql(task.end_date),
                    time_to_sql(task.end_time),
                    date_to_sql(task.deadline),
                    task.is_future as i32,
                    task.color,
                ],
            )
            .context("Failed to insert task")?;

        task.id = self.db.connection().last_insert_rowid();
        Ok(task)
    }

    pub fn find(&self, id: TaskId) -> Result<Option<Task>> {
        self.db
            .connection()
            .query_row(
                "SELECT id, title, start_date, start_time, end_date, end_time, deadline, is_future, color
                 FROM tasks WHERE id = ?1",
                [id],
                row_to_task,
            )
            .optional()
            .with_context(|| format!("Failed to load task {}", id))
    }

    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .db
            .connection()
            .prepare(
                "SELECT id, title, start_date, start_time, end_date, end_time, deadline, is_future, color
                 FROM tasks ORDER BY id",
            )
            .context("Failed to prepare task query")?;

        let tasks = stmt
            .query_map([], row_to_task)
            .context("Failed to query tasks")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read task row")?;
        Ok(tasks)
    }

    pub fn count(&self) -> Result<i64> {
        self.db
            .connection()
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .context("Failed to count tasks")
    }
}

impl TaskStore for SqliteTaskStore {
    fn get_task(&self, id: TaskId) -> Option<Task> {
        match self.find(id) {
            Ok(task) => task,
            Err(err) => {
                log::error!("{:#}", err);
                None
            }
        }
    }

    /// Writes the patched fields in a single UPDATE.
    fn update_task(&mut self, id: TaskId, patch: &TaskPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(value) = patch.start_date {
            assignments.push("start_date = ?");
            values.push(Box::new(date_to_sql(value)));
        }
        if let Some(value) = patch.start_time {
            assignments.push("start_time = ?");
            values.push(Box::new(time_to_sql(value)));
        }
        if let Some(value) = patch.end_date {
            assignments.push("end_date = ?");
            values.push(Box::new(date_to_sql(value)));
        }
        if let Some(value) = patch.end_time {
            assignments.push("end_time = ?");
            values.push(Box::new(time_to_sql(value)));
        }
        if let Some(value) = patch.is_future {
            assignments.push("is_future = ?");
            values.push(Box::new(value as i32));
        }
        values.push(Box::new(id));

        let sql = format!(
            "UPDATE tasks SET {}, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            assignments.join(", ")
        );
        let changed = self
            .db
            .connection()
            .execute(&sql, rusqlite::params_from_iter(values.iter()))
            .with_context(|| format!("Failed to update task {}", id))?;

        if changed == 0 {
            return Err(anyhow!("task {} not found", id));
        }
        Ok(())
    }
}
