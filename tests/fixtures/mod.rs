// Test fixtures - reusable schedule data
// Provides a consistent study day across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use roadmap_calendar::models::schedule_block::{BlockId, BlockType, ScheduleBlock};

/// Monday 10 March 2025
pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn next_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()
}

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    day().and_hms_opt(h, m, 0).unwrap()
}

pub fn at_on(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).unwrap()
}

pub fn block(id: BlockId, kind: BlockType, title: &str, start: NaiveDateTime, end: NaiveDateTime) -> ScheduleBlock {
    ScheduleBlock::new(id, kind, title, start, end).unwrap()
}

pub fn study(id: BlockId, start: NaiveDateTime, end: NaiveDateTime) -> ScheduleBlock {
    block(id, BlockType::Study, &format!("Topic {}", id), start, end)
}

/// Two days: a study morning with a pinned break, then an exam day.
pub fn two_day_roadmap() -> Vec<ScheduleBlock> {
    vec![
        study(1, at(9, 0), at(10, 0)),
        study(2, at(10, 15), at(11, 15)),
        block(3, BlockType::Break, "Break", at(12, 0), at(12, 15)),
        block(4, BlockType::Hobby, "Guitar", at(18, 0), at(19, 0)),
        block(
            5,
            BlockType::Exam,
            "Calculus final",
            at_on(next_day(), 9, 0),
            at_on(next_day(), 12, 0),
        ),
    ]
}
