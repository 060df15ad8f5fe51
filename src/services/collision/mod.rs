//! Overlap resolution for the blocks of a single day.
//!
//! A single top-to-bottom sweep: blocks are ordered by `top` (the block being
//! moved wins ties) and every block that starts before the previous block's
//! bottom plus the gap is pushed down to exactly that boundary. Pushes cascade
//! through the rest of the day.

use std::cmp::Ordering;

use crate::models::schedule_block::BlockId;

pub const DEFAULT_GAP: f32 = 8.0;

/// A block's vertical extent in grid pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRect {
    pub id: BlockId,
    pub top: f32,
    pub height: f32,
}

impl BlockRect {
    pub fn new(id: BlockId, top: f32, height: f32) -> Self {
        Self { id, top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Resolve overlaps, returning the blocks in top order.
///
/// Deterministic: equal inputs give equal outputs. The block identified by
/// `moved` sorts ahead of any block sharing its `top`, so it is the other
/// block that gets pushed.
pub fn resolve_collisions(blocks: &[BlockRect], moved: Option<BlockId>, gap: f32) -> Vec<BlockRect> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by(|a, b| match a.top.total_cmp(&b.top) {
        Ordering::Equal => {
            let a_moved = Some(a.id) == moved;
            let b_moved = Some(b.id) == moved;
            // true sorts first
            b_moved.cmp(&a_moved)
        }
        other => other,
    });

    for index in 1..sorted.len() {
        let boundary = sorted[index - 1].bottom() + gap;
        if sorted[index].top < boundary {
            sorted[index].top = boundary;
        }
    }

    sorted
}

/// Blocks whose `top` differs between `before` and `after` (matched by id).
pub fn shifted_blocks(before: &[BlockRect], after: &[BlockRect]) -> Vec<BlockRect> {
    after
        .iter()
        .filter(|resolved| {
            before
                .iter()
                .find(|original| original.id == resolved.id)
                .map_or(true, |original| (original.top - resolved.top).abs() > f32::EPSILON)
        })
        .copied()
        .collect()
}
