use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_schedule_blocks_table(conn)?;
    run_schedule_migrations(conn)?;
    Ok(())
}

fn create_schedule_blocks_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schedule_blocks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            task_id INTEGER,
            exam_id INTEGER,
            start_time TEXT,
            end_time TEXT,
            day_date TEXT,
            block_type TEXT NOT NULL DEFAULT 'study'
                CHECK(block_type IN ('study', 'break', 'hobby', 'exam')),
            completed INTEGER NOT NULL DEFAULT 0,
            task_title TEXT NOT NULL DEFAULT '',
            exam_name TEXT
        )",
        [],
    )
    .context("Failed to create schedule_blocks table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_schedule_day ON schedule_blocks(day_date)",
        [],
    )
    .context("Failed to create schedule_blocks day index")?;

    Ok(())
}

fn run_schedule_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "schedule_blocks",
        "is_delayed",
        "ALTER TABLE schedule_blocks ADD COLUMN is_delayed INTEGER NOT NULL DEFAULT 0",
    )?;

    migrations::ensure_column(
        conn,
        "schedule_blocks",
        "deferred_original_day",
        "ALTER TABLE schedule_blocks ADD COLUMN deferred_original_day TEXT",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_adds_missing_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE schedule_blocks (
                id INTEGER PRIMARY KEY,
                start_time TEXT,
                end_time TEXT,
                day_date TEXT,
                block_type TEXT NOT NULL DEFAULT 'study',
                completed INTEGER NOT NULL DEFAULT 0,
                task_id INTEGER,
                exam_id INTEGER,
                task_title TEXT NOT NULL DEFAULT '',
                exam_name TEXT
            )",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        assert!(migrations::column_exists(&conn, "schedule_blocks", "is_delayed").unwrap());
        assert!(migrations::column_exists(&conn, "schedule_blocks", "deferred_original_day").unwrap());
    }
}
