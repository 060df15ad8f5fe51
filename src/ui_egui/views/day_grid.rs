//! Day grid rendering and input.
//!
//! Paints the selected day's hour labels, blocks and now marker inside a
//! vertical scroll area, and routes mouse drags to the pointer controller and
//! raw touch phases to the touch controller. Nothing here mutates the schedule
//! beyond drag previews; everything else is returned as a [`GridAction`] for the
//! app to apply and persist.

use std::time::{Duration, Instant};

use egui::epaint::Shadow;
use egui::{pos2, vec2, Align2, Color32, CursorIcon, FontId, Id, Pos2, Rect, RichText, Sense, Stroke, TouchId, TouchPhase};

use super::palette::{with_alpha, DayGridPalette};
use crate::models::schedule_block::{BlockId, BlockType};
use crate::models::settings::GridSettings;
use crate::services::gesture::{
    DoubleTap, DragCommit, DragController, DragPreview, HitTarget, SwipeReveal, TouchDrag, TouchResponse,
};
use crate::services::grid::{DayLayout, PositionedBlock, ScheduleGrid};
use crate::services::timers::Timers;
use crate::ui_egui::surface::EguiScrollSurface;

pub const TIME_LABEL_WIDTH: f32 = 56.0;
/// Space above the first hour line inside the scrolled content.
pub const GRID_PADDING: f32 = 8.0;
const CONTROL_SIZE: f32 = 18.0;
const CONTROL_MARGIN: f32 = 4.0;
const LIFTED_OPACITY: f32 = 0.8;

/// Something the user asked for that the app has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    Commit(DragCommit),
    Edit(BlockId),
    SetCompleted { id: BlockId, completed: bool },
    RequestDelete(BlockId),
}

#[derive(Debug, Clone, Copy)]
struct BlockHitBox {
    id: BlockId,
    body: Rect,
    toggle: Rect,
    delete: Option<Rect>,
}

impl BlockHitBox {
    fn target_at(&self, pos: Pos2) -> Option<HitTarget> {
        if self.delete.is_some_and(|rect| rect.contains(pos)) {
            Some(HitTarget::DeleteAction)
        } else if self.toggle.contains(pos) {
            Some(HitTarget::CompletionToggle)
        } else if self.body.contains(pos) {
            Some(HitTarget::Body)
        } else {
            None
        }
    }
}

/// How a block is drawn: translucent over a drop shadow while lifted.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BlockStyle {
    opacity: f32,
    shadow: Option<Shadow>,
}

impl BlockStyle {
    fn new(lifted: bool) -> Self {
        if lifted {
            Self {
                opacity: LIFTED_OPACITY,
                shadow: Some(Shadow {
                    offset: vec2(0.0, 4.0),
                    blur: 12.0,
                    spread: 0.0,
                    color: Color32::from_black_alpha(60),
                }),
            }
        } else {
            Self {
                opacity: 1.0,
                shadow: None,
            }
        }
    }
}

pub struct DayGridView {
    surface: EguiScrollSurface,
    /// Block rects from the last painted frame, in screen coordinates.
    hit_boxes: Vec<BlockHitBox>,
    swipe: SwipeReveal,
    double_tap: DoubleTap,
    active_touch: Option<TouchId>,
}

impl DayGridView {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            surface: EguiScrollSurface::new(),
            hit_boxes: Vec::new(),
            swipe: SwipeReveal::new(settings.swipe_reveal_distance, settings.touch_tolerance),
            double_tap: DoubleTap::new(),
            active_touch: None,
        }
    }

    pub fn surface_mut(&mut self) -> &mut EguiScrollSurface {
        &mut self.surface
    }

    /// Forget per-day interaction state after switching days.
    pub fn reset_gestures(&mut self) {
        self.swipe.dismiss();
        self.double_tap.reset();
        self.hit_boxes.clear();
    }

    fn hit_at(&self, pos: Pos2) -> Option<(BlockId, HitTarget)> {
        // Topmost first: blocks are painted in order, so search backwards
        self.hit_boxes
            .iter()
            .rev()
            .find_map(|hit_box| hit_box.target_at(pos).map(|target| (hit_box.id, target)))
    }

    /// Feed this frame's raw touch phases to the touch controller.
    ///
    /// Only the first finger down is followed; further fingers are left to
    /// egui (pinch, two-finger scroll).
    pub fn handle_touch_events(
        &mut self,
        ctx: &egui::Context,
        grid: &mut ScheduleGrid,
        touch: &mut TouchDrag,
        timers: &mut Timers,
        now: Instant,
    ) -> Vec<GridAction> {
        let events: Vec<(TouchId, TouchPhase, Pos2)> = ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some((*id, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });

        let mut actions = Vec::new();
        for (touch_id, phase, pos) in events {
            let finger = (pos.x, pos.y);
            match phase {
                TouchPhase::Start => {
                    if self.active_touch.is_some() {
                        continue;
                    }
                    self.active_touch = Some(touch_id);
                    match self.hit_at(pos) {
                        Some((id, HitTarget::Body)) => {
                            if self.double_tap.register(id, finger, now) {
                                if grid.block(id).is_some_and(|block| block.block_type.is_editable()) {
                                    actions.push(GridAction::Edit(id));
                                }
                                continue;
                            }
                            touch.touch_start(grid, timers, id, HitTarget::Body, finger, now);
                            self.swipe.begin(id, finger);
                        }
                        // The egui widget under the finger handles its own tap
                        Some((_, _)) => {}
                        None => self.swipe.dismiss(),
                    }
                }
                TouchPhase::Move if self.active_touch == Some(touch_id) => {
                    match touch.touch_move(grid, &self.surface, timers, finger) {
                        TouchResponse::Passive => {
                            self.swipe.update(finger);
                        }
                        TouchResponse::Captured => {}
                    }
                }
                TouchPhase::End if self.active_touch == Some(touch_id) => {
                    self.active_touch = None;
                    if let Some(commit) = touch.touch_end(grid, &mut self.surface, timers) {
                        actions.push(GridAction::Commit(commit));
                    }
                    self.swipe.end();
                }
                TouchPhase::Cancel if self.active_touch == Some(touch_id) => {
                    self.active_touch = None;
                    touch.touch_cancel(grid, &mut self.surface, timers);
                    self.swipe.dismiss();
                }
                _ => {}
            }
        }
        actions
    }

    /// Paint the selected day and collect what the user did to it.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        grid: &mut ScheduleGrid,
        controller: &mut DragController,
        now: Instant,
    ) -> Vec<GridAction> {
        let Some(layout) = grid.layout().cloned() else {
            self.hit_boxes.clear();
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Nothing scheduled yet")
                        .size(16.0)
                        .color(Color32::GRAY),
                );
            });
            return Vec::new();
        };

        let mut scroll = egui::ScrollArea::vertical()
            .id_source("day_grid_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = self.surface.take_scroll_target() {
            scroll = scroll.vertical_scroll_offset(offset);
        }
        if self.surface.is_locked() {
            scroll = scroll.enable_scrolling(false).drag_to_scroll(false);
        }

        let output = scroll.show(ui, |ui| self.paint_day(ui, &layout, grid, controller, now));
        self.surface.sync(
            output.inner_rect,
            output.state.offset.y,
            output.content_size.y,
            GRID_PADDING,
        );
        output.inner
    }

    fn paint_day(
        &mut self,
        ui: &mut egui::Ui,
        layout: &DayLayout,
        grid: &mut ScheduleGrid,
        controller: &mut DragController,
        now: Instant,
    ) -> Vec<GridAction> {
        let palette = DayGridPalette::for_visuals(ui.visuals());
        let settings = grid.settings().clone();
        let transition = Duration::from_millis(settings.transition_ms);

        let desired = vec2(ui.available_width(), layout.grid_height + GRID_PADDING * 2.0);
        let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
        let origin_y = rect.top() + GRID_PADDING;
        let column = Rect::from_min_max(
            pos2(rect.left() + TIME_LABEL_WIDTH + CONTROL_MARGIN, origin_y),
            pos2(rect.right() - CONTROL_MARGIN, origin_y + layout.grid_height),
        );

        ui.painter().rect_filled(rect, 0.0, palette.background);
        paint_hour_lines(ui, layout, rect, origin_y, &palette);

        // Fading copies of blocks that were just removed
        for departing in grid.departing() {
            if departing.positioned.block.day_key() != Some(layout.day) {
                continue;
            }
            let progress = departing.progress(now, transition);
            let positioned = &departing.positioned;
            let full = block_rect(column, origin_y, positioned.rect.top, positioned.rect.height, &settings);
            let shrunk = Rect::from_center_size(full.center(), full.size() * (1.0 - 0.2 * progress));
            let alpha = ((1.0 - progress) * 255.0) as u8;
            ui.painter()
                .rect_filled(shrunk, 4.0, with_alpha(palette.block_fill(&positioned.block), alpha));
        }

        // The lifted block is painted last so it floats above the others
        let lifted = controller.dragging_block();
        let mut order: Vec<&PositionedBlock> = layout.blocks.iter().collect();
        order.sort_by_key(|positioned| Some(positioned.id()) == lifted);

        let mut actions = Vec::new();
        self.hit_boxes.clear();
        for positioned in order {
            let id = positioned.id();
            let swipe_offset = self.swipe.offset_for(id);
            let top = grid.preview_top(id).unwrap_or(positioned.rect.top);
            let body = block_rect(column, origin_y, top, positioned.rect.height, &settings)
                .translate(vec2(swipe_offset, 0.0));

            let sense = if controller.is_touch() || !positioned.draggable {
                Sense::click()
            } else {
                Sense::click_and_drag()
            };
            let mut response = ui.interact(body, Id::new(("schedule_block", id)), sense);

            if let DragController::Pointer(pointer) = &mut *controller {
                if response.drag_started() {
                    // egui hands the drag to the body even when the press was on a control
                    let toggle = toggle_rect(body);
                    let controls = BlockHitBox {
                        id,
                        body,
                        toggle,
                        delete: delete_rect(body, toggle, swipe_offset, false, true),
                    };
                    let press = ui.input(|input| input.pointer.press_origin());
                    let target = press
                        .and_then(|pos| controls.target_at(pos))
                        .unwrap_or(HitTarget::Body);
                    let press_y = press.map_or(body.top(), |pos| pos.y);
                    pointer.press(grid, id, target, press_y - origin_y);
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        pointer.drag(grid, pos.y - origin_y);
                    }
                }
                if response.drag_stopped() {
                    if let Some(commit) = pointer.release(grid) {
                        actions.push(GridAction::Commit(commit));
                    }
                }
                if response.double_clicked() && positioned.block.block_type.is_editable() {
                    actions.push(GridAction::Edit(id));
                }
                if pointer.lifted_block() == Some(id) {
                    ui.output_mut(|out| out.cursor_icon = CursorIcon::Grabbing);
                } else if positioned.draggable {
                    response = response.on_hover_cursor(CursorIcon::Grab);
                }
            }

            // Re-read after the drag update so the block tracks the pointer this frame
            let top = grid.preview_top(id).unwrap_or(positioned.rect.top);
            let body = block_rect(column, origin_y, top, positioned.rect.height, &settings)
                .translate(vec2(swipe_offset, 0.0));
            let lifted_now = controller.dragging_block() == Some(id);
            let live = lifted_now.then(|| DragPreview::new(layout, id, top));
            let exam_index = positioned.block.exam().and_then(|exam| grid.exam_index(exam));
            paint_block(ui, positioned, body, column, live, exam_index, &palette);

            let toggle = toggle_rect(body);
            let mut completed = positioned.block.completed;
            let toggled = ui
                .scope(|ui| {
                    if lifted_now {
                        ui.set_opacity(LIFTED_OPACITY);
                        ui.disable();
                    }
                    ui.put(toggle, egui::Checkbox::without_text(&mut completed))
                        .changed()
                })
                .inner;
            if toggled {
                actions.push(GridAction::SetCompleted { id, completed });
            }

            let delete = if lifted_now {
                None
            } else {
                delete_rect(body, toggle, swipe_offset, controller.is_touch(), response.hovered())
            };
            if let Some(delete) = delete {
                let button = egui::Button::new(RichText::new("🗑").color(Color32::WHITE))
                    .fill(palette.delete_action);
                if ui.put(delete, button).clicked() {
                    self.swipe.dismiss();
                    actions.push(GridAction::RequestDelete(id));
                }
            }

            self.hit_boxes.push(BlockHitBox {
                id,
                body,
                toggle,
                delete,
            });
        }

        if let Some(offset) = layout.now_offset {
            let y = origin_y + offset;
            let painter = ui.painter();
            painter.circle_filled(pos2(column.left() - 4.0, y), 3.0, palette.now_line);
            painter.line_segment(
                [pos2(column.left(), y), pos2(column.right(), y)],
                Stroke::new(2.0, palette.now_line),
            );
        }

        actions
    }
}

fn toggle_rect(body: Rect) -> Rect {
    Rect::from_min_size(
        pos2(body.right() - CONTROL_SIZE - CONTROL_MARGIN, body.top() + CONTROL_MARGIN),
        vec2(CONTROL_SIZE, CONTROL_SIZE),
    )
}

fn block_rect(column: Rect, origin_y: f32, top: f32, height: f32, settings: &GridSettings) -> Rect {
    // The floor only affects painting; layout and collisions use the real height
    let painted = height.max(settings.min_block_height);
    Rect::from_min_size(pos2(column.left(), origin_y + top), vec2(column.width(), painted))
}

/// Where the delete action sits: in the gap a swipe opened on touch, next to
/// the checkbox on hover with a mouse.
fn delete_rect(body: Rect, toggle: Rect, swipe_offset: f32, touch: bool, hovered: bool) -> Option<Rect> {
    if touch {
        (swipe_offset < 0.0).then(|| {
            Rect::from_min_max(pos2(body.right(), body.top()), pos2(body.right() - swipe_offset, body.bottom()))
        })
    } else {
        hovered.then(|| {
            Rect::from_min_size(
                pos2(toggle.left() - CONTROL_SIZE - CONTROL_MARGIN, toggle.top()),
                vec2(CONTROL_SIZE, CONTROL_SIZE),
            )
        })
    }
}

fn paint_hour_lines(ui: &egui::Ui, layout: &DayLayout, rect: Rect, origin_y: f32, palette: &DayGridPalette) {
    let painter = ui.painter();
    let line_left = rect.left() + TIME_LABEL_WIDTH;
    let half_hour = layout.scale.px_per_hour / 2.0;

    for label in &layout.hour_labels {
        let y = origin_y + label.offset;
        painter.line_segment(
            [pos2(line_left, y), pos2(rect.right(), y)],
            Stroke::new(1.0, palette.hour_line),
        );
        if label.offset + half_hour < layout.grid_height {
            painter.line_segment(
                [pos2(line_left, y + half_hour), pos2(rect.right(), y + half_hour)],
                Stroke::new(1.0, palette.half_hour_line),
            );
        }
        painter.text(
            pos2(line_left - 6.0, y),
            Align2::RIGHT_CENTER,
            label.text(),
            FontId::proportional(12.0),
            palette.label,
        );
    }
}

fn paint_block(
    ui: &egui::Ui,
    positioned: &PositionedBlock,
    body: Rect,
    column: Rect,
    live: Option<DragPreview>,
    exam_index: Option<usize>,
    palette: &DayGridPalette,
) {
    let block = &positioned.block;
    let style = BlockStyle::new(live.is_some());
    if let Some(shadow) = style.shadow {
        ui.painter().add(shadow.as_shape(body, 4.0));
    }
    let mut painter = ui.painter().with_clip_rect(column.expand(2.0));
    painter.set_opacity(style.opacity);

    painter.rect_filled(body, 4.0, palette.block_fill(block));
    let accent = Rect::from_min_size(body.min, vec2(4.0, body.height()));
    painter.rect_filled(accent, 2.0, palette.block_accent(block, exam_index));
    if live.is_some() {
        painter.rect_stroke(body, 4.0, Stroke::new(1.5, palette.drag_outline));
    }

    let text_left = accent.right() + 6.0;
    let text_width = (body.width() - CONTROL_SIZE * 2.0 - 24.0).max(20.0);
    let time_label = match live {
        Some(preview) => preview.time_label(),
        None => positioned.time_range_label(),
    };
    painter.text(
        pos2(text_left, body.top() + 3.0),
        Align2::LEFT_TOP,
        time_label,
        FontId::proportional(10.0),
        palette.block_text.gamma_multiply(0.7),
    );

    let title = if block.completed {
        format!("✓ {}", block.display_title())
    } else {
        block.display_title().to_string()
    };
    let mut job = egui::text::LayoutJob::simple_singleline(title, FontId::proportional(13.0), palette.block_text);
    job.wrap.max_width = text_width;
    job.wrap.max_rows = 1;
    job.wrap.break_anywhere = true;
    let galley = ui.fonts(|fonts| fonts.layout_job(job));
    painter.galley(pos2(text_left, body.top() + 15.0), galley, palette.block_text);

    let mut detail_y = body.top() + 32.0;
    if block.block_type == BlockType::Study {
        if let Some(exam_name) = block.exam_name.as_deref().filter(|name| !name.is_empty()) {
            painter.text(
                pos2(text_left, detail_y),
                Align2::LEFT_TOP,
                exam_name,
                FontId::proportional(10.0),
                palette.block_text.gamma_multiply(0.6),
            );
            detail_y += 13.0;
        }
    }
    if block.is_delayed && detail_y + 10.0 < body.bottom() {
        painter.text(
            pos2(text_left, detail_y),
            Align2::LEFT_TOP,
            "⚠ Delayed",
            FontId::proportional(10.0),
            palette.delayed_badge,
        );
    }
    if block.block_type == BlockType::Hobby {
        painter.text(
            body.right_bottom() + vec2(-8.0, -4.0),
            Align2::RIGHT_BOTTOM,
            "✨",
            FontId::proportional(11.0),
            palette.block_text.gamma_multiply(0.5),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gesture::test_support;
    use crate::services::gesture::PointerDrag;
    use egui::{Event, Modifiers, PointerButton};

    fn hit_box() -> BlockHitBox {
        BlockHitBox {
            id: 4,
            body: Rect::from_min_size(pos2(60.0, 100.0), vec2(300.0, 160.0)),
            toggle: Rect::from_min_size(pos2(338.0, 104.0), vec2(18.0, 18.0)),
            delete: None,
        }
    }

    #[test]
    fn test_controls_take_precedence_over_body() {
        let hit_box = hit_box();
        assert_eq!(hit_box.target_at(pos2(345.0, 110.0)), Some(HitTarget::CompletionToggle));
        assert_eq!(hit_box.target_at(pos2(120.0, 200.0)), Some(HitTarget::Body));
        assert_eq!(hit_box.target_at(pos2(20.0, 200.0)), None);
    }

    #[test]
    fn test_revealed_delete_is_hit() {
        let hit_box = BlockHitBox {
            delete: Some(Rect::from_min_max(pos2(312.0, 100.0), pos2(360.0, 260.0))),
            ..hit_box()
        };
        assert_eq!(hit_box.target_at(pos2(330.0, 200.0)), Some(HitTarget::DeleteAction));
    }

    #[test]
    fn test_delete_rect_follows_input_mode() {
        let body = Rect::from_min_size(pos2(12.0, 100.0), vec2(300.0, 160.0));
        let toggle = Rect::from_min_size(pos2(290.0, 104.0), vec2(18.0, 18.0));

        assert_eq!(delete_rect(body, toggle, 0.0, true, true), None);
        let swiped = delete_rect(body, toggle, -48.0, true, false).unwrap();
        assert_eq!(swiped.width(), 48.0);
        assert_eq!(swiped.left(), body.right());

        assert_eq!(delete_rect(body, toggle, 0.0, false, false), None);
        assert!(delete_rect(body, toggle, 0.0, false, true).is_some());
    }

    #[test]
    fn test_short_blocks_are_painted_at_the_floor() {
        let column = Rect::from_min_max(pos2(60.0, 8.0), pos2(400.0, 3848.0));
        let settings = GridSettings::default();
        let rect = block_rect(column, 8.0, 160.0, 10.0, &settings);
        assert_eq!(rect.height(), settings.min_block_height);
        assert_eq!(rect.top(), 168.0);
    }

    /// Drives the view through real egui frames with a pointer controller.
    struct GridHarness {
        ctx: egui::Context,
        view: DayGridView,
        grid: ScheduleGrid,
        controller: DragController,
    }

    impl GridHarness {
        fn new() -> Self {
            let (grid, _timers) = test_support::grid();
            let mut harness = Self {
                ctx: egui::Context::default(),
                view: DayGridView::new(grid.settings()),
                controller: DragController::Pointer(PointerDrag::new(grid.settings().gap)),
                grid,
            };
            harness.frame(Vec::new());
            harness
        }

        fn frame(&mut self, events: Vec<Event>) -> Vec<GridAction> {
            let input = egui::RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 1000.0))),
                events,
                ..Default::default()
            };
            let mut actions = Vec::new();
            let ctx = self.ctx.clone();
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    actions = self.view.show(ui, &mut self.grid, &mut self.controller, Instant::now());
                });
            });
            actions
        }

        fn hit_box(&self, id: BlockId) -> BlockHitBox {
            *self.view.hit_boxes.iter().find(|hit_box| hit_box.id == id).unwrap()
        }

        fn button(pos: Pos2, pressed: bool) -> Event {
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            }
        }

        fn press_and_move(&mut self, from: Pos2, dy: f32) -> Vec<GridAction> {
            let mut actions = self.frame(vec![Event::PointerMoved(from), Self::button(from, true)]);
            let to = from + vec2(0.0, dy);
            actions.extend(self.frame(vec![Event::PointerMoved(to)]));
            actions
        }

        fn release(&mut self) -> Vec<GridAction> {
            let pos = self.ctx.input(|input| input.pointer.latest_pos()).unwrap();
            self.frame(vec![Self::button(pos, false)])
        }
    }

    #[test]
    fn test_drag_from_checkbox_does_not_move_block() {
        let mut harness = GridHarness::new();
        let toggle = harness.hit_box(1).toggle.center();

        let mut actions = harness.press_and_move(toggle, 180.0);
        assert_eq!(harness.controller.dragging_block(), None);
        assert!(!harness.grid.has_preview());

        actions.extend(harness.release());
        assert!(actions.is_empty(), "unexpected actions: {:?}", actions);
        assert!(!harness.grid.has_preview());
    }

    #[test]
    fn test_drag_from_body_commits_move() {
        let mut harness = GridHarness::new();
        let body = harness.hit_box(1).body;
        let grab = pos2(body.left() + 40.0, body.center().y);

        harness.press_and_move(grab, 180.0);
        assert_eq!(harness.controller.dragging_block(), Some(1));
        assert!(harness.grid.preview_top(1).is_some_and(|top| top > 160.0));

        let actions = harness.release();
        let commit = actions.iter().find_map(|action| match action {
            GridAction::Commit(commit) => Some(commit),
            _ => None,
        });
        assert_eq!(commit.map(|commit| commit.moved_id), Some(1));
        assert_eq!(harness.controller.dragging_block(), None);
    }

    #[test]
    fn test_lifted_block_hides_delete_action() {
        let mut harness = GridHarness::new();
        let body = harness.hit_box(1).body;
        let grab = pos2(body.left() + 40.0, body.center().y);

        // Hovering with a mouse reveals the delete button
        harness.frame(vec![Event::PointerMoved(grab)]);
        assert!(harness.hit_box(1).delete.is_some());

        harness.press_and_move(grab, 120.0);
        assert_eq!(harness.controller.dragging_block(), Some(1));
        assert_eq!(harness.hit_box(1).delete, None);
        harness.release();
    }

    #[test]
    fn test_lifted_style_is_translucent_with_shadow() {
        let resting = BlockStyle::new(false);
        assert_eq!(resting.opacity, 1.0);
        assert_eq!(resting.shadow, None);

        let lifted = BlockStyle::new(true);
        assert_eq!(lifted.opacity, LIFTED_OPACITY);
        assert!(lifted.shadow.is_some_and(|shadow| shadow.blur > 0.0));
    }
}
