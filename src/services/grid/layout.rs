//! Pure layout of one day's blocks onto the hour grid.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::models::schedule_block::{BlockId, ScheduleBlock};
use crate::services::collision::BlockRect;
use crate::services::mapper::{datetime_to_offset, grid_height, GridScale, HOURS_PER_DAY};
use crate::utils::date::minutes_to_clock_label;

/// Latest hour a grid may start at, however late the first block is.
pub const MAX_START_HOUR: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourLabel {
    pub hour: u32,
    pub offset: f32,
}

impl HourLabel {
    pub fn text(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// A block with its position on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedBlock {
    pub block: ScheduleBlock,
    pub rect: BlockRect,
    pub draggable: bool,
}

impl PositionedBlock {
    pub fn id(&self) -> BlockId {
        self.block.id
    }

    /// "9:00 - 10:00"
    pub fn time_range_label(&self) -> String {
        match self.block.span() {
            Some(span) => format!(
                "{} - {}",
                clock_label(span.start),
                clock_label(span.end)
            ),
            None => String::new(),
        }
    }
}

fn clock_label(value: NaiveDateTime) -> String {
    minutes_to_clock_label((value.hour() * 60 + value.minute()) as i64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub day: NaiveDate,
    pub is_today: bool,
    pub start_hour: u32,
    pub scale: GridScale,
    pub grid_height: f32,
    pub hour_labels: Vec<HourLabel>,
    /// Sorted by top.
    pub blocks: Vec<PositionedBlock>,
    pub now_offset: Option<f32>,
}

impl DayLayout {
    pub fn block(&self, id: BlockId) -> Option<&PositionedBlock> {
        self.blocks.iter().find(|positioned| positioned.id() == id)
    }

    pub fn rects(&self) -> Vec<BlockRect> {
        self.blocks.iter().map(|positioned| positioned.rect).collect()
    }

    /// Offset of the now marker, if `now` falls on this day's visible grid.
    pub fn now_offset_for(&self, now: NaiveDateTime) -> Option<f32> {
        if now.date() != self.day {
            return None;
        }
        let offset = datetime_to_offset(now, self.day, self.start_hour, self.scale.px_per_hour);
        (0.0..=self.grid_height).contains(&offset).then_some(offset)
    }
}

/// Earliest block hour minus one, clamped to `0..=MAX_START_HOUR`. Days with no
/// positionable blocks start at midnight.
pub fn grid_start_hour(blocks: &[ScheduleBlock]) -> u32 {
    blocks
        .iter()
        .filter_map(|block| block.span())
        .map(|span| span.start.hour())
        .min()
        .map(|hour| hour.saturating_sub(1).min(MAX_START_HOUR))
        .unwrap_or(0)
}

pub fn layout_day(
    day: NaiveDate,
    blocks: &[ScheduleBlock],
    scale: GridScale,
    now: NaiveDateTime,
) -> DayLayout {
    let start_hour = grid_start_hour(blocks);
    let height = grid_height(start_hour, scale.px_per_hour);

    let hour_labels = (start_hour..HOURS_PER_DAY)
        .map(|hour| HourLabel {
            hour,
            offset: (hour - start_hour) as f32 * scale.px_per_hour,
        })
        .collect();

    let mut positioned: Vec<PositionedBlock> = blocks
        .iter()
        .filter_map(|block| {
            let Some(span) = block.span() else {
                log::warn!("Skipping block {} without a usable start/end time", block.id);
                return None;
            };
            let top = datetime_to_offset(span.start, day, start_hour, scale.px_per_hour);
            let bottom = datetime_to_offset(span.end, day, start_hour, scale.px_per_hour);
            Some(PositionedBlock {
                rect: BlockRect::new(block.id, top, bottom - top),
                draggable: block.is_draggable(),
                block: block.clone(),
            })
        })
        .collect();
    positioned.sort_by(|a, b| a.rect.top.total_cmp(&b.rect.top).then(a.id().cmp(&b.id())));

    let mut layout = DayLayout {
        day,
        is_today: now.date() == day,
        start_hour,
        scale,
        grid_height: height,
        hour_labels,
        blocks: positioned,
        now_offset: None,
    };
    layout.now_offset = layout.now_offset_for(now);
    layout
}
