use anyhow::{Context, Result};
use rusqlite::Connection;

/// True when `table` already has `column`.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let matches: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to read columns of {}", table))?;
    Ok(matches > 0)
}

/// Runs `ddl` unless the column is already present.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if !column_exists(conn, table, column)? {
        log::info!("migrating {}: adding column {}", table, column);
        conn.execute(ddl, [])
            .with_context(|| format!("Failed to add column {} to {}", column, table))?;
    }
    Ok(())
}
