//! Drag gestures over the day grid.
//!
//! Two controllers share one commit contract: the pointer controller for mice
//! and trackpads, the touch controller for long-press drags. Which one runs is
//! decided once at startup from [`InputCapabilities`]; the rest of the app only
//! sees a [`DragController`] and the [`DragCommit`]s it produces.

pub mod pointer;
pub mod swipe;
pub mod tap;
pub mod touch;

use chrono::NaiveDate;

use crate::models::schedule_block::BlockId;
use crate::models::settings::{GridSettings, InputMode};
use crate::services::collision::{resolve_collisions, shifted_blocks, BlockRect};
use crate::services::grid::DayLayout;
use crate::services::mapper::{offset_to_time, GridScale};
use crate::utils::date::minutes_to_clock_label;

pub use pointer::PointerDrag;
pub use swipe::SwipeReveal;
pub use tap::DoubleTap;
pub use touch::{TouchDrag, TouchResponse, TouchState};

/// Which part of a block a press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Body,
    CompletionToggle,
    DeleteAction,
}

impl HitTarget {
    /// Child controls never start a drag.
    pub fn is_control(&self) -> bool {
        !matches!(self, HitTarget::Body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputCapabilities {
    pub precise_pointer: bool,
    pub hover: bool,
}

impl InputCapabilities {
    pub const POINTER: Self = Self {
        precise_pointer: true,
        hover: true,
    };
    pub const TOUCH: Self = Self {
        precise_pointer: false,
        hover: false,
    };

    /// Resolve the configured mode against the platform.
    pub fn probe(mode: InputMode) -> Self {
        match mode {
            InputMode::Pointer => Self::POINTER,
            InputMode::Touch => Self::TOUCH,
            InputMode::Auto => {
                if cfg!(any(target_os = "android", target_os = "ios")) {
                    Self::TOUCH
                } else {
                    Self::POINTER
                }
            }
        }
    }

    pub fn supports_pointer_drag(&self) -> bool {
        self.precise_pointer && self.hover
    }
}

/// The one drag controller active for the session.
#[derive(Debug)]
pub enum DragController {
    Pointer(PointerDrag),
    Touch(TouchDrag),
}

impl DragController {
    pub fn for_capabilities(capabilities: InputCapabilities, settings: &GridSettings) -> Self {
        if capabilities.supports_pointer_drag() {
            log::info!("Using pointer drag controller");
            DragController::Pointer(PointerDrag::new(settings.gap))
        } else {
            log::info!("Using touch drag controller");
            DragController::Touch(TouchDrag::new(settings))
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, DragController::Touch(_))
    }

    /// Block currently lifted under the pointer or finger.
    pub fn dragging_block(&self) -> Option<BlockId> {
        match self {
            DragController::Pointer(pointer) => pointer.lifted_block(),
            DragController::Touch(touch) => touch.dragging_block(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging_block().is_some()
    }
}

/// Position of the dragged block during a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPreview {
    pub id: BlockId,
    pub top: f32,
    /// Minutes since midnight at `top`.
    pub start_minutes: i64,
}

impl DragPreview {
    pub fn new(layout: &DayLayout, id: BlockId, top: f32) -> Self {
        Self {
            id,
            top,
            start_minutes: offset_to_time(top, layout.start_hour as f32, layout.scale.px_per_hour),
        }
    }

    pub fn time_label(&self) -> String {
        minutes_to_clock_label(self.start_minutes)
    }
}

/// Final resolved arrangement of a gesture, in grid pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCommit {
    pub day: NaiveDate,
    pub start_hour: u32,
    pub scale: GridScale,
    pub moved_id: BlockId,
    /// The moved block followed by every block the resolver shifted.
    pub positions: Vec<BlockRect>,
}

impl DragCommit {
    pub fn from_resolution(layout: &DayLayout, moved_id: BlockId, resolved: &[BlockRect]) -> Self {
        let before = layout.rects();
        let mut positions: Vec<BlockRect> = resolved
            .iter()
            .filter(|rect| rect.id == moved_id)
            .copied()
            .collect();
        positions.extend(
            shifted_blocks(&before, resolved)
                .into_iter()
                .filter(|rect| rect.id != moved_id),
        );
        Self {
            day: layout.day,
            start_hour: layout.start_hour,
            scale: layout.scale,
            moved_id,
            positions,
        }
    }
}

/// Keep a block inside the grid.
pub fn clamp_top(layout: &DayLayout, height: f32, top: f32) -> f32 {
    let max = (layout.grid_height - height).max(0.0);
    top.clamp(0.0, max)
}

/// Snapped drop position that stays inside the grid. The lower bound is the
/// last snap multiple the block still fits above, so a drop at the bottom edge
/// lands on the interval too.
pub fn snap_top(layout: &DayLayout, height: f32, top: f32) -> f32 {
    let max = layout.scale.snap_floor((layout.grid_height - height).max(0.0));
    layout.scale.snap(top).clamp(0.0, max)
}

/// Resolve the day with `moved` placed at `top`.
pub fn resolve_drop(layout: &DayLayout, moved: BlockId, top: f32, gap: f32) -> Vec<BlockRect> {
    let candidates: Vec<BlockRect> = layout
        .blocks
        .iter()
        .map(|positioned| {
            if positioned.id() == moved {
                BlockRect { top, ..positioned.rect }
            } else {
                positioned.rect
            }
        })
        .collect();
    resolve_collisions(&candidates, Some(moved), gap)
}

/// Conversion between viewport coordinates and grid offsets, plus the scroll
/// container controls a touch drag needs.
#[cfg_attr(test, mockall::automock)]
pub trait DragSurface {
    /// Current vertical scroll of the container.
    fn scroll_offset(&self) -> f32;
    /// Top of the grid within the scrolled content.
    fn grid_origin_y(&self) -> f32;
    /// Screen y of the container's visible top edge.
    fn viewport_top(&self) -> f32;
    fn viewport_height(&self) -> f32;
    fn scroll_by(&mut self, delta: f32);
    fn halt_momentum(&mut self);
    fn set_scroll_locked(&mut self, locked: bool);
    fn haptic_pulse(&mut self);
}

/// Screen y to grid offset, honouring the container's current scroll.
pub fn screen_to_grid_y(surface: &dyn DragSurface, screen_y: f32) -> f32 {
    screen_y - surface.viewport_top() + surface.scroll_offset() - surface.grid_origin_y()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::models::schedule_block::{BlockId, BlockType, ScheduleBlock};
    use crate::models::settings::GridSettings;
    use crate::services::grid::ScheduleGrid;
    use crate::services::mapper::GridScale;
    use crate::services::timers::Timers;

    pub fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    pub fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    pub fn block(id: BlockId, kind: BlockType, start: NaiveDateTime, end: NaiveDateTime) -> ScheduleBlock {
        ScheduleBlock::new(id, kind, "Block", start, end).unwrap()
    }

    /// Grid starting at 08:00 at 160 px/h: block 1 09:00-10:00 (top 160),
    /// block 2 10:15-11:15 (top 360), break 3 at 12:00 (top 640).
    pub fn grid() -> (ScheduleGrid, Timers) {
        let mut grid = ScheduleGrid::new(GridSettings::default());
        grid.replace_schedule(vec![
            block(1, BlockType::Study, at(9, 0), at(10, 0)),
            block(2, BlockType::Study, at(10, 15), at(11, 15)),
            block(3, BlockType::Break, at(12, 0), at(12, 15)),
        ]);
        let mut timers = Timers::new();
        grid.rebuild(
            &mut timers,
            GridScale::new(160.0, 15),
            at(7, 0) - chrono::Duration::days(1),
            std::time::Instant::now(),
        );
        (grid, timers)
    }
}
