//! Mouse and trackpad drags.
//!
//! Vertical only. The block snaps while it moves and other blocks are pushed
//! out of its way in the preview on every tick. Nothing lifts until the pointer
//! actually moves, so a plain click on a block never disturbs the layout.

use crate::models::schedule_block::BlockId;
use crate::services::grid::ScheduleGrid;

use super::{resolve_drop, snap_top, DragCommit, DragPreview, HitTarget};

#[derive(Debug, Clone, Copy)]
struct PointerSession {
    id: BlockId,
    origin_top: f32,
    height: f32,
    press_y: f32,
    lifted: bool,
    top: f32,
}

#[derive(Debug)]
pub struct PointerDrag {
    gap: f32,
    session: Option<PointerSession>,
}

impl PointerDrag {
    pub fn new(gap: f32) -> Self {
        Self { gap, session: None }
    }

    /// Start tracking a press. `pointer_y` is in grid offsets.
    ///
    /// Presses on child controls and on fixed blocks are ignored.
    pub fn press(&mut self, grid: &ScheduleGrid, id: BlockId, target: HitTarget, pointer_y: f32) -> bool {
        if target.is_control() {
            return false;
        }
        let Some(positioned) = grid.layout().and_then(|layout| layout.block(id)) else {
            return false;
        };
        if !positioned.draggable {
            return false;
        }
        self.session = Some(PointerSession {
            id,
            origin_top: positioned.rect.top,
            height: positioned.rect.height,
            press_y: pointer_y,
            lifted: false,
            top: positioned.rect.top,
        });
        true
    }

    /// Follow the pointer and refresh the collision preview.
    pub fn drag(&mut self, grid: &mut ScheduleGrid, pointer_y: f32) -> Option<DragPreview> {
        let session = self.session.as_mut()?;
        let delta = pointer_y - session.press_y;
        if !session.lifted {
            if delta == 0.0 {
                return None;
            }
            session.lifted = true;
            log::debug!("Pointer lifted block {}", session.id);
        }

        let layout = grid.layout()?;
        let top = snap_top(layout, session.height, session.origin_top + delta);
        session.top = top;

        let preview = DragPreview::new(layout, session.id, top);
        let resolved = resolve_drop(layout, session.id, top, self.gap);
        grid.set_preview(resolved.into_iter().map(|rect| (rect.id, rect.top)));
        Some(preview)
    }

    /// Finish the gesture. A press that never moved is a click and commits
    /// nothing.
    pub fn release(&mut self, grid: &mut ScheduleGrid) -> Option<DragCommit> {
        let session = self.session.take()?;
        if !session.lifted {
            return None;
        }
        let commit = grid.layout().map(|layout| {
            let resolved = resolve_drop(layout, session.id, session.top, self.gap);
            DragCommit::from_resolution(layout, session.id, &resolved)
        });
        grid.clear_preview();
        commit
    }

    pub fn lifted_block(&self) -> Option<BlockId> {
        self.session
            .filter(|session| session.lifted)
            .map(|session| session.id)
    }
}
