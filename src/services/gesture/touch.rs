//! Long-press touch drags.
//!
//! `Idle → Armed → Dragging → Idle`. While armed, the touch is passive and the
//! container keeps scrolling natively; moving past the tolerance means the user
//! is scrolling and the press is abandoned. Once the long-press timer fires the
//! controller captures the touch, locks scrolling and runs a per-frame loop that
//! scrolls the container when the finger sits near an edge.

use std::time::{Duration, Instant};

use crate::models::schedule_block::BlockId;
use crate::models::settings::GridSettings;
use crate::services::grid::ScheduleGrid;
use crate::services::timers::{TimerHandle, TimerId, Timers};

use super::{clamp_top, resolve_drop, screen_to_grid_y, snap_top, DragCommit, DragPreview, DragSurface, HitTarget};

/// Observable state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    Idle,
    Armed(BlockId),
    Dragging(BlockId),
}

/// Whether a touch-move was consumed by the drag or left to native scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchResponse {
    Passive,
    Captured,
}

#[derive(Debug)]
struct Armed {
    id: BlockId,
    start: (f32, f32),
    long_press: TimerHandle,
}

#[derive(Debug)]
struct Dragging {
    id: BlockId,
    height: f32,
    /// Finger position relative to the block's top, in grid offsets.
    grab_offset: f32,
    finger_y: f32,
    top: f32,
    frame_loop: TimerHandle,
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Armed(Armed),
    Dragging(Dragging),
}

#[derive(Debug)]
pub struct TouchDrag {
    long_press: Duration,
    tolerance: f32,
    edge_margin_top: f32,
    edge_margin_bottom: f32,
    autoscroll_step: f32,
    gap: f32,
    last_finger: (f32, f32),
    phase: Phase,
}

impl TouchDrag {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            long_press: Duration::from_millis(settings.long_press_ms),
            tolerance: settings.touch_tolerance,
            edge_margin_top: settings.edge_margin_top,
            edge_margin_bottom: settings.edge_margin_bottom,
            autoscroll_step: settings.autoscroll_step,
            gap: settings.gap,
            last_finger: (0.0, 0.0),
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> TouchState {
        match &self.phase {
            Phase::Idle => TouchState::Idle,
            Phase::Armed(armed) => TouchState::Armed(armed.id),
            Phase::Dragging(dragging) => TouchState::Dragging(dragging.id),
        }
    }

    pub fn dragging_block(&self) -> Option<BlockId> {
        match &self.phase {
            Phase::Dragging(dragging) => Some(dragging.id),
            _ => None,
        }
    }

    /// A finger went down on a block. `finger` is in screen coordinates.
    pub fn touch_start(
        &mut self,
        grid: &ScheduleGrid,
        timers: &mut Timers,
        id: BlockId,
        target: HitTarget,
        finger: (f32, f32),
        now: Instant,
    ) -> bool {
        if !matches!(self.phase, Phase::Idle) || target.is_control() {
            return false;
        }
        let draggable = grid
            .layout()
            .and_then(|layout| layout.block(id))
            .is_some_and(|positioned| positioned.draggable);
        if !draggable {
            return false;
        }

        self.last_finger = finger;
        self.phase = Phase::Armed(Armed {
            id,
            start: finger,
            long_press: timers.start_once(self.long_press, now),
        });
        log::debug!("Touch armed on block {}", id);
        true
    }

    pub fn touch_move(
        &mut self,
        grid: &mut ScheduleGrid,
        surface: &dyn DragSurface,
        timers: &mut Timers,
        finger: (f32, f32),
    ) -> TouchResponse {
        self.last_finger = finger;
        match &self.phase {
            Phase::Idle => TouchResponse::Passive,
            Phase::Armed(armed) => {
                let dx = (finger.0 - armed.start.0).abs();
                let dy = (finger.1 - armed.start.1).abs();
                if dx > self.tolerance || dy > self.tolerance {
                    log::debug!("Touch on block {} became a scroll", armed.id);
                    self.reset(timers);
                }
                TouchResponse::Passive
            }
            Phase::Dragging(_) => {
                self.track_finger(grid, surface);
                TouchResponse::Captured
            }
        }
    }

    /// Feed timers fired this frame. Returns true if any belonged to this
    /// controller.
    pub fn on_timers(
        &mut self,
        fired: &[TimerId],
        grid: &mut ScheduleGrid,
        surface: &mut dyn DragSurface,
        timers: &mut Timers,
        now: Instant,
    ) -> bool {
        match &self.phase {
            Phase::Armed(armed) if fired.contains(&armed.long_press.id()) => {
                self.promote(grid, surface, timers, now);
                true
            }
            Phase::Dragging(dragging) if fired.contains(&dragging.frame_loop.id()) => {
                self.autoscroll(grid, surface);
                true
            }
            _ => false,
        }
    }

    /// Finger lifted. Commits when a drag was in progress.
    pub fn touch_end(
        &mut self,
        grid: &mut ScheduleGrid,
        surface: &mut dyn DragSurface,
        timers: &mut Timers,
    ) -> Option<DragCommit> {
        let commit = match &self.phase {
            Phase::Dragging(dragging) => grid.layout().map(|layout| {
                let top = snap_top(layout, dragging.height, dragging.top);
                let resolved = resolve_drop(layout, dragging.id, top, self.gap);
                DragCommit::from_resolution(layout, dragging.id, &resolved)
            }),
            _ => None,
        };
        self.unwind(grid, surface, timers);
        commit
    }

    /// The platform took the touch away. Everything goes back to where it was.
    pub fn touch_cancel(&mut self, grid: &mut ScheduleGrid, surface: &mut dyn DragSurface, timers: &mut Timers) {
        if !matches!(self.phase, Phase::Idle) {
            log::debug!("Touch gesture cancelled");
        }
        self.unwind(grid, surface, timers);
    }

    fn promote(&mut self, grid: &mut ScheduleGrid, surface: &mut dyn DragSurface, timers: &mut Timers, now: Instant) {
        let Phase::Armed(armed) = std::mem::take(&mut self.phase) else {
            return;
        };
        // The once-timer has already retired; stopping it is a no-op.
        timers.stop(armed.long_press);

        let Some(rect) = grid
            .layout()
            .and_then(|layout| layout.block(armed.id))
            .map(|positioned| positioned.rect)
        else {
            return;
        };

        surface.haptic_pulse();
        surface.halt_momentum();
        surface.set_scroll_locked(true);

        let finger_y = self.last_finger.1;
        let grid_y = screen_to_grid_y(surface, finger_y);
        self.phase = Phase::Dragging(Dragging {
            id: armed.id,
            height: rect.height,
            grab_offset: grid_y - rect.top,
            finger_y,
            top: rect.top,
            frame_loop: timers.start_frame_loop(now),
        });
        log::debug!("Touch drag started on block {}", armed.id);
        self.track_finger(grid, surface);
    }

    fn autoscroll(&mut self, grid: &mut ScheduleGrid, surface: &mut dyn DragSurface) {
        let Phase::Dragging(dragging) = &self.phase else {
            return;
        };
        let within = dragging.finger_y - surface.viewport_top();
        if within < self.edge_margin_top {
            surface.scroll_by(-self.autoscroll_step);
        } else if within > surface.viewport_height() - self.edge_margin_bottom {
            surface.scroll_by(self.autoscroll_step);
        }
        self.track_finger(grid, surface);
    }

    /// Keep the block under the finger, accounting for the container scroll.
    fn track_finger(&mut self, grid: &mut ScheduleGrid, surface: &dyn DragSurface) -> Option<DragPreview> {
        let finger_y = self.last_finger.1;
        let Phase::Dragging(dragging) = &mut self.phase else {
            return None;
        };
        let layout = grid.layout()?;
        dragging.finger_y = finger_y;
        let raw = screen_to_grid_y(surface, finger_y) - dragging.grab_offset;
        dragging.top = clamp_top(layout, dragging.height, raw);

        let preview = DragPreview::new(layout, dragging.id, dragging.top);
        grid.set_preview([(dragging.id, dragging.top)]);
        Some(preview)
    }

    /// Live position of the dragged block.
    pub fn preview(&self, grid: &ScheduleGrid) -> Option<DragPreview> {
        match &self.phase {
            Phase::Dragging(dragging) => grid
                .layout()
                .map(|layout| DragPreview::new(layout, dragging.id, dragging.top)),
            _ => None,
        }
    }

    fn unwind(&mut self, grid: &mut ScheduleGrid, surface: &mut dyn DragSurface, timers: &mut Timers) {
        if matches!(self.phase, Phase::Dragging(_)) {
            surface.set_scroll_locked(false);
            grid.clear_preview();
        }
        self.reset(timers);
    }

    fn reset(&mut self, timers: &mut Timers) {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => {}
            Phase::Armed(armed) => {
                timers.stop(armed.long_press);
            }
            Phase::Dragging(dragging) => {
                timers.stop(dragging.frame_loop);
            }
        }
    }
}
