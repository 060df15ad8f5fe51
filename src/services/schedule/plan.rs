//! Turning resolved pixel positions back into block times.

use chrono::{Duration, NaiveDate};

use crate::models::schedule_block::{BlockId, BlockPatch, BlockSpan};
use crate::services::collision::BlockRect;
use crate::services::gesture::DragCommit;
use crate::services::mapper::{grid_height, offset_to_datetime, GridScale};

/// A block's committed times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    pub id: BlockId,
    pub span: BlockSpan,
    /// Ends past the bottom of its day's grid.
    pub is_delayed: bool,
}

impl BlockPlacement {
    pub fn patch(&self) -> BlockPatch {
        BlockPatch::reschedule(self.span, self.is_delayed)
    }
}

/// Convert one rect to absolute local times on `day`.
///
/// Start and duration are each rounded to the minute, so a block keeps its
/// length even when its pixel height is fractional.
pub fn place_block(day: NaiveDate, rect: &BlockRect, start_hour: u32, scale: GridScale) -> Option<BlockPlacement> {
    let start = offset_to_datetime(rect.top, day, start_hour, scale.px_per_hour);
    let minutes = scale.px_to_minutes(rect.height);
    if minutes <= 0 {
        log::warn!("Refusing to place block {} with zero duration", rect.id);
        return None;
    }
    let span = BlockSpan::new(start, start + Duration::minutes(minutes))?;
    Some(BlockPlacement {
        id: rect.id,
        span,
        is_delayed: rect.bottom() > grid_height(start_hour, scale.px_per_hour),
    })
}

pub fn plan_commit(commit: &DragCommit) -> Vec<BlockPlacement> {
    commit
        .positions
        .iter()
        .filter_map(|rect| place_block(commit.day, rect, commit.start_hour, commit.scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_drop_at_quarter_to_keeps_hour_length() {
        // Grid from 08:00 at 160 px/h, one-hour block dropped at 09:45
        let rect = BlockRect::new(7, 280.0, 160.0);
        let placement = place_block(day(), &rect, 8, GridScale::new(160.0, 15)).unwrap();
        let patch = serde_json::to_value(placement.patch()).unwrap();

        assert_eq!(
            patch,
            serde_json::json!({
                "start_time": "2025-03-10T09:45:00",
                "end_time": "2025-03-10T10:45:00",
                "is_delayed": false
            })
        );
    }

    #[test]
    fn test_block_past_grid_end_is_delayed() {
        let scale = GridScale::new(100.0, 15);
        // 23:30 on a grid starting at 10:00, one hour long
        let rect = BlockRect::new(1, 1350.0, 100.0);
        let placement = place_block(day(), &rect, 10, scale).unwrap();

        assert!(placement.is_delayed);
        assert_eq!(
            placement.span.end,
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap().and_hms_opt(0, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_zero_height_is_rejected() {
        let rect = BlockRect::new(1, 40.0, 0.2);
        assert!(place_block(day(), &rect, 0, GridScale::new(160.0, 15)).is_none());
    }

    #[test]
    fn test_plan_commit_places_every_position() {
        let commit = DragCommit {
            day: day(),
            start_hour: 8,
            scale: GridScale::new(160.0, 15),
            moved_id: 1,
            positions: vec![BlockRect::new(1, 280.0, 160.0), BlockRect::new(2, 448.0, 160.0)],
        };
        let placements = plan_commit(&commit);
        let ids: Vec<BlockId> = placements.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        // 448 px = 2.8 h after 08:00
        assert_eq!(
            placements[1].span.start,
            day().and_hms_opt(10, 48, 0).unwrap()
        );
    }
}
