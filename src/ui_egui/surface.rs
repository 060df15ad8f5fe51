//! Bridge between the touch drag controller and the grid's egui `ScrollArea`.
//!
//! egui hands back the scroll state after a frame is laid out, while the
//! controller reads and drives it between frames. This type keeps the last
//! known geometry and queues programmatic scrolls for the next frame.

use egui::Rect;

use crate::services::gesture::DragSurface;

#[derive(Debug, Default)]
pub struct EguiScrollSurface {
    scroll_offset: f32,
    max_offset: f32,
    grid_origin_y: f32,
    viewport_top: f32,
    viewport_height: f32,
    pending_scroll: bool,
    locked: bool,
    haptic_pulses: u32,
}

impl EguiScrollSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record what the scroll area looked like after this frame.
    pub fn sync(&mut self, viewport: Rect, offset: f32, content_height: f32, grid_origin_y: f32) {
        self.viewport_top = viewport.top();
        self.viewport_height = viewport.height();
        self.max_offset = (content_height - viewport.height()).max(0.0);
        self.grid_origin_y = grid_origin_y;
        if !self.pending_scroll {
            self.scroll_offset = offset;
        }
    }

    /// Offset to force on the scroll area this frame, if any.
    ///
    /// While locked the offset is pinned every frame so neither drag nor
    /// leftover momentum can move the container under the finger.
    pub fn take_scroll_target(&mut self) -> Option<f32> {
        if self.pending_scroll || self.locked {
            self.pending_scroll = false;
            Some(self.scroll_offset)
        } else {
            None
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn haptic_pulses(&self) -> u32 {
        self.haptic_pulses
    }
}

impl DragSurface for EguiScrollSurface {
    fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    fn grid_origin_y(&self) -> f32 {
        self.grid_origin_y
    }

    fn viewport_top(&self) -> f32 {
        self.viewport_top
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn scroll_by(&mut self, delta: f32) {
        let target = (self.scroll_offset + delta).clamp(0.0, self.max_offset);
        if target != self.scroll_offset {
            self.scroll_offset = target;
            self.pending_scroll = true;
        }
    }

    fn halt_momentum(&mut self) {
        self.pending_scroll = true;
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn haptic_pulse(&mut self) {
        // No vibration API on desktop; the pulse is only counted and logged.
        self.haptic_pulses += 1;
        log::debug!("Haptic pulse");
    }
}
