//! Horizontal swipe that slides a block aside to reveal its delete action.

use crate::models::schedule_block::BlockId;

#[derive(Debug, Clone, Copy)]
struct SwipeTrack {
    id: BlockId,
    start: (f32, f32),
    offset: f32,
    abandoned: bool,
}

#[derive(Debug)]
pub struct SwipeReveal {
    reveal_distance: f32,
    tolerance: f32,
    tracking: Option<SwipeTrack>,
    revealed: Option<BlockId>,
}

impl SwipeReveal {
    pub fn new(reveal_distance: f32, tolerance: f32) -> Self {
        Self {
            reveal_distance,
            tolerance,
            tracking: None,
            revealed: None,
        }
    }

    pub fn begin(&mut self, id: BlockId, pos: (f32, f32)) {
        if self.revealed.is_some_and(|revealed| revealed != id) {
            self.revealed = None;
        }
        self.tracking = Some(SwipeTrack {
            id,
            start: pos,
            offset: self.resting_offset(id),
            abandoned: false,
        });
    }

    /// Horizontal slide of the tracked block, from `-reveal_distance` to 0.
    /// A mostly vertical gesture is a scroll and abandons the swipe.
    pub fn update(&mut self, pos: (f32, f32)) -> Option<f32> {
        let resting = self.tracking.map(|track| self.resting_offset(track.id))?;
        let track = self.tracking.as_mut()?;
        if track.abandoned {
            return None;
        }
        let dx = pos.0 - track.start.0;
        let dy = pos.1 - track.start.1;
        if dy.abs() > self.tolerance && dy.abs() > dx.abs() {
            track.abandoned = true;
            return None;
        }
        track.offset = (resting + dx).clamp(-self.reveal_distance, 0.0);
        Some(track.offset)
    }

    /// Finish the swipe; the block stays open if it travelled past half the
    /// reveal distance.
    pub fn end(&mut self) -> Option<BlockId> {
        let track = self.tracking.take()?;
        if track.abandoned {
            return self.revealed;
        }
        self.revealed = (track.offset <= -self.reveal_distance / 2.0).then_some(track.id);
        self.revealed
    }

    pub fn revealed(&self) -> Option<BlockId> {
        self.revealed
    }

    pub fn dismiss(&mut self) {
        self.tracking = None;
        self.revealed = None;
    }

    /// Offset to paint `id` at.
    pub fn offset_for(&self, id: BlockId) -> f32 {
        match self.tracking {
            Some(track) if track.id == id && !track.abandoned => track.offset,
            _ => self.resting_offset(id),
        }
    }

    fn resting_offset(&self, id: BlockId) -> f32 {
        if self.revealed == Some(id) {
            -self.reveal_distance
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_past_half_reveals() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        assert_eq!(swipe.update((170.0, 102.0)), Some(-30.0));
        assert_eq!(swipe.end(), Some(1));
        assert_eq!(swipe.offset_for(1), -48.0);
    }

    #[test]
    fn test_short_swipe_snaps_back() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        swipe.update((190.0, 100.0));
        assert_eq!(swipe.end(), None);
        assert_eq!(swipe.offset_for(1), 0.0);
    }

    #[test]
    fn test_slide_is_clamped() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        assert_eq!(swipe.update((20.0, 100.0)), Some(-48.0));
        assert_eq!(swipe.update((260.0, 100.0)), Some(0.0));
    }

    #[test]
    fn test_vertical_motion_abandons_swipe() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        assert_eq!(swipe.update((195.0, 140.0)), None);
        assert_eq!(swipe.update((120.0, 140.0)), None);
        assert_eq!(swipe.end(), None);
    }

    #[test]
    fn test_swiping_another_block_closes_the_first() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        swipe.update((140.0, 100.0));
        swipe.end();

        swipe.begin(2, (200.0, 300.0));
        assert_eq!(swipe.revealed(), None);
        assert_eq!(swipe.offset_for(1), 0.0);
    }

    #[test]
    fn test_swipe_right_closes_revealed_block() {
        let mut swipe = SwipeReveal::new(48.0, 8.0);
        swipe.begin(1, (200.0, 100.0));
        swipe.update((140.0, 100.0));
        swipe.end();

        swipe.begin(1, (150.0, 100.0));
        assert_eq!(swipe.update((190.0, 100.0)), Some(-8.0));
        assert_eq!(swipe.end(), None);
    }
}
