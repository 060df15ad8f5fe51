//! Local schedule store backed by SQLite.
//!
//! Follows the hosted API's semantics: moving `start_time` also moves
//! `day_date`, and deferring keeps the wall-clock times on the following day.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveTime};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use crate::models::schedule_block::{BlockId, BlockPatch, BlockType, ScheduleBlock};
use crate::services::database::Database;
use crate::utils::date::{format_day_key, format_local_timestamp, parse_day_key, parse_local_timestamp};

use super::{BackendError, BackendResult, ScheduleBackend};

const SELECT_BLOCK: &str = "SELECT id, task_id, exam_id, block_type, day_date, start_time, end_time,
        completed, is_delayed, task_title, exam_name
     FROM schedule_blocks";

pub struct SqliteScheduleBackend {
    db: Mutex<Database>,
}

impl SqliteScheduleBackend {
    pub fn open(path: &str) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| BackendError::Storage("schedule database lock poisoned".to_string()))
    }

    /// Insert a block, keeping its id when it has one. Returns the stored id.
    pub fn insert_block(&self, block: &ScheduleBlock) -> Result<BlockId> {
        let db = self.lock()?;
        let conn = db.connection();
        let id = (block.id > 0).then_some(block.id);
        conn.execute(
            "INSERT INTO schedule_blocks
                (id, task_id, exam_id, block_type, day_date, start_time, end_time,
                 completed, is_delayed, task_title, exam_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id,
                block.task_id,
                block.exam_id,
                block.block_type.as_str(),
                block.day_key().map(format_day_key),
                block.start_time.as_ref().map(format_local_timestamp),
                block.end_time.as_ref().map(format_local_timestamp),
                block.completed,
                block.is_delayed,
                block.title,
                block.exam_name,
            ],
        )
        .context("Failed to insert schedule block")?;
        Ok(conn.last_insert_rowid())
    }

    fn require_block(&self, db: &Database, id: BlockId) -> BackendResult<ScheduleBlock> {
        let sql = format!("{} WHERE id = ?1", SELECT_BLOCK);
        db.connection()
            .query_row(&sql, [id], row_to_block)
            .optional()?
            .ok_or(BackendError::NotFound(id))
    }
}

fn row_to_block(row: &Row<'_>) -> rusqlite::Result<ScheduleBlock> {
    let block_type: String = row.get(3)?;
    let day_date: Option<String> = row.get(4)?;
    let start_time: Option<String> = row.get(5)?;
    let end_time: Option<String> = row.get(6)?;

    Ok(ScheduleBlock {
        id: row.get(0)?,
        task_id: row.get(1)?,
        exam_id: row.get(2)?,
        block_type: block_type.parse().unwrap_or_else(|err| {
            log::warn!("{}; treating as study", err);
            BlockType::Study
        }),
        day_date: day_date.and_then(|raw| parse_day_key(&raw).ok()),
        start_time: start_time.and_then(|raw| parse_local_timestamp(&raw).ok()),
        end_time: end_time.and_then(|raw| parse_local_timestamp(&raw).ok()),
        completed: row.get(7)?,
        is_delayed: row.get(8)?,
        title: row.get(9)?,
        exam_name: row.get(10)?,
    })
}

impl ScheduleBackend for SqliteScheduleBackend {
    fn fetch_schedule(&self) -> BackendResult<Vec<ScheduleBlock>> {
        let db = self.lock()?;
        let sql = format!("{} ORDER BY day_date, start_time", SELECT_BLOCK);
        let mut stmt = db.connection().prepare(&sql)?;
        let blocks = stmt
            .query_map([], row_to_block)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks)
    }

    fn update_block(&self, id: BlockId, patch: &BlockPatch) -> BackendResult<()> {
        let db = self.lock()?;
        self.require_block(&db, id)?;
        if patch.is_empty() {
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(title) = &patch.task_title {
            assignments.push("task_title = ?");
            values.push(SqlValue::Text(title.clone()));
        }
        if let Some(start) = &patch.start_time {
            assignments.push("start_time = ?");
            values.push(SqlValue::Text(format_local_timestamp(start)));
            assignments.push("day_date = ?");
            values.push(SqlValue::Text(format_day_key(start.date())));
        }
        if let Some(end) = &patch.end_time {
            assignments.push("end_time = ?");
            values.push(SqlValue::Text(format_local_timestamp(end)));
        }
        if let Some(delayed) = patch.is_delayed {
            assignments.push("is_delayed = ?");
            values.push(SqlValue::Integer(delayed as i64));
        }
        values.push(SqlValue::Integer(id));

        let sql = format!("UPDATE schedule_blocks SET {} WHERE id = ?", assignments.join(", "));
        db.connection().execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    fn delete_block(&self, id: BlockId) -> BackendResult<()> {
        let db = self.lock()?;
        let removed = db
            .connection()
            .execute("DELETE FROM schedule_blocks WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(BackendError::NotFound(id));
        }
        Ok(())
    }

    fn set_completed(&self, id: BlockId, completed: bool) -> BackendResult<()> {
        let db = self.lock()?;
        let changed = db.connection().execute(
            "UPDATE schedule_blocks SET completed = ?1 WHERE id = ?2",
            params![completed, id],
        )?;
        if changed == 0 {
            return Err(BackendError::NotFound(id));
        }
        Ok(())
    }

    fn defer_block(&self, id: BlockId) -> BackendResult<NaiveDate> {
        let db = self.lock()?;
        let block = self.require_block(&db, id)?;
        let Some(day) = block.day_key() else {
            return Err(BackendError::Status {
                action: "defer block",
                status: 400,
            });
        };
        let next_day = day
            .succ_opt()
            .ok_or_else(|| BackendError::Storage("date out of range".to_string()))?;

        // Missing times fall back to 08:00 and one hour, as the server does
        let start_clock = block
            .start_time
            .map(|start| start.time())
            .unwrap_or_else(|| NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN));
        let start = next_day.and_time(start_clock);
        let end = match block.end_time {
            Some(end) => next_day.and_time(end.time()),
            None => start + Duration::hours(1),
        };

        db.connection().execute(
            "UPDATE schedule_blocks
             SET start_time = ?1, end_time = ?2, day_date = ?3, is_delayed = 1,
                 deferred_original_day = ?4
             WHERE id = ?5",
            params![
                format_local_timestamp(&start),
                format_local_timestamp(&end),
                format_day_key(next_day),
                format_day_key(day),
                id
            ],
        )?;
        Ok(next_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn seeded() -> SqliteScheduleBackend {
        let backend = SqliteScheduleBackend::in_memory().unwrap();
        backend
            .insert_block(&ScheduleBlock::new(1, BlockType::Study, "Limits", at(10, 9, 0), at(10, 10, 0)).unwrap())
            .unwrap();
        backend
            .insert_block(&ScheduleBlock::new(2, BlockType::Break, "", at(10, 10, 0), at(10, 10, 15)).unwrap())
            .unwrap();
        backend
    }

    #[test]
    fn test_fetch_returns_inserted_blocks() {
        let blocks = seeded().fetch_schedule().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title, "Limits");
        assert_eq!(blocks[1].block_type, BlockType::Break);
        assert_eq!(blocks[0].span().map(|s| s.start), Some(at(10, 9, 0)));
    }

    #[test]
    fn test_update_moves_day_with_start() {
        let backend = seeded();
        let patch = BlockPatch {
            start_time: Some(at(11, 8, 0)),
            end_time: Some(at(11, 9, 0)),
            is_delayed: Some(false),
            task_title: Some("Series".to_string()),
        };
        backend.update_block(1, &patch).unwrap();

        let block = backend
            .fetch_schedule()
            .unwrap()
            .into_iter()
            .find(|b| b.id == 1)
            .unwrap();
        assert_eq!(block.day_date, NaiveDate::from_ymd_opt(2025, 3, 11));
        assert_eq!(block.title, "Series");
        assert_eq!(block.end_time, Some(at(11, 9, 0)));
    }

    #[test]
    fn test_missing_blocks_are_not_found() {
        let backend = seeded();
        assert!(matches!(backend.delete_block(99), Err(BackendError::NotFound(99))));
        assert!(matches!(backend.set_completed(99, true), Err(BackendError::NotFound(99))));
        assert!(matches!(
            backend.update_block(99, &BlockPatch::default()),
            Err(BackendError::NotFound(99))
        ));
    }

    #[test]
    fn test_delete_and_complete() {
        let backend = seeded();
        backend.set_completed(1, true).unwrap();
        backend.delete_block(2).unwrap();

        let blocks = backend.fetch_schedule().unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].completed);
    }

    #[test]
    fn test_defer_keeps_clock_time() {
        let backend = seeded();
        let day = backend.defer_block(1).unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 3, 11).unwrap());

        let block = backend
            .fetch_schedule()
            .unwrap()
            .into_iter()
            .find(|b| b.id == 1)
            .unwrap();
        assert_eq!(block.start_time, Some(at(11, 9, 0)));
        assert_eq!(block.end_time, Some(at(11, 10, 0)));
        assert!(block.is_delayed);
    }
}
