//! Double-tap recognition for touch input, where egui's double-click timing
//! does not apply.

use std::time::{Duration, Instant};

use crate::models::schedule_block::BlockId;

pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);
pub const DOUBLE_TAP_SLOP: f32 = 24.0;

#[derive(Debug, Clone, Copy)]
struct Tap {
    id: BlockId,
    pos: (f32, f32),
    at: Instant,
}

#[derive(Debug, Default)]
pub struct DoubleTap {
    last: Option<Tap>,
}

impl DoubleTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tap. Returns true when it completes a double tap on the same
    /// block.
    pub fn register(&mut self, id: BlockId, pos: (f32, f32), at: Instant) -> bool {
        let is_double = self.last.is_some_and(|last| {
            last.id == id
                && at.saturating_duration_since(last.at) <= DOUBLE_TAP_WINDOW
                && (pos.0 - last.pos.0).hypot(pos.1 - last.pos.1) <= DOUBLE_TAP_SLOP
        });
        self.last = if is_double { None } else { Some(Tap { id, pos, at }) };
        is_double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
