//! Confirmation dialog for destructive actions.
//!
//! Deleting a block asks first. Hobby blocks get a lighter prompt since
//! dropping one is usually a welcome change of plan rather than a loss.

use std::time::Instant;

use egui::{Context, RichText};

use super::RoadmapApp;
use crate::models::schedule_block::{BlockId, BlockType};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    DeleteBlock {
        block_id: BlockId,
        block_title: String,
        block_type: BlockType,
    },
}

impl ConfirmAction {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteBlock {
                block_type: BlockType::Hobby,
                ..
            } => "Skip the fun?",
            ConfirmAction::DeleteBlock { .. } => "Delete Block",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfirmAction::DeleteBlock {
                block_title,
                block_type: BlockType::Hobby,
                ..
            } => format!(
                "Are you sure you want to give up \"{}\"?\n\nEveryone needs a break now and then.",
                block_title
            ),
            ConfirmAction::DeleteBlock { block_title, .. } => format!(
                "Are you sure you want to delete \"{}\"?\n\nThis action cannot be undone.",
                block_title
            ),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteBlock {
                block_type: BlockType::Hobby,
                ..
            } => "🎨",
            ConfirmAction::DeleteBlock { .. } => "⚠",
        }
    }

    pub fn confirm_text(&self) -> &'static str {
        match self {
            ConfirmAction::DeleteBlock {
                block_type: BlockType::Hobby,
                ..
            } => "Yes, skip it",
            ConfirmAction::DeleteBlock { .. } => "Yes, Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Cancelled,
    /// Dialog is still open
    Pending,
}

#[derive(Debug, Default)]
pub struct ConfirmDialogState {
    pending_action: Option<ConfirmAction>,
}

impl ConfirmDialogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request confirmation for an action, replacing any pending one.
    pub fn request(&mut self, action: ConfirmAction) {
        self.pending_action = Some(action);
    }

    pub fn is_open(&self) -> bool {
        self.pending_action.is_some()
    }

    /// Render the confirmation dialog and return the result
    pub fn render(&mut self, ctx: &Context) -> ConfirmResult {
        let Some(action) = &self.pending_action else {
            return ConfirmResult::Pending;
        };

        let mut result = ConfirmResult::Pending;

        egui::Window::new(action.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(300.0);
                ui.set_max_width(400.0);

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(action.icon())
                            .size(24.0)
                            .color(egui::Color32::from_rgb(220, 150, 50)),
                    );
                    ui.vertical(|ui| {
                        ui.label(action.message());
                    });
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let confirm_button = egui::Button::new(
                            RichText::new(action.confirm_text()).color(egui::Color32::WHITE),
                        )
                        .fill(egui::Color32::from_rgb(180, 60, 60));

                        if ui.add(confirm_button).clicked() {
                            result = ConfirmResult::Confirmed;
                        }

                        ui.add_space(10.0);

                        if ui.button("Cancel").clicked() {
                            result = ConfirmResult::Cancelled;
                        }
                    });
                });

                ui.add_space(5.0);
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            result = ConfirmResult::Cancelled;
        }

        if result == ConfirmResult::Cancelled {
            self.pending_action = None;
        }

        result
    }

    pub fn take_action(&mut self) -> Option<ConfirmAction> {
        self.pending_action.take()
    }
}

impl RoadmapApp {
    pub(super) fn handle_confirm_dialog(&mut self, ctx: &Context, instant: Instant) {
        if self.confirm_dialog.render(ctx) != ConfirmResult::Confirmed {
            return;
        }
        if let Some(action) = self.confirm_dialog.take_action() {
            self.execute_confirmed_action(action, instant);
        }
    }

    fn execute_confirmed_action(&mut self, action: ConfirmAction, instant: Instant) {
        match action {
            ConfirmAction::DeleteBlock {
                block_id,
                block_title,
                ..
            } => {
                self.delete_block(block_id, instant);
                self.toast_manager.success(format!("Deleted \"{}\"", block_title));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(block_type: BlockType) -> ConfirmAction {
        ConfirmAction::DeleteBlock {
            block_id: 3,
            block_title: "Guitar".to_string(),
            block_type,
        }
    }

    #[test]
    fn test_hobby_blocks_get_softer_copy() {
        let hobby = delete(BlockType::Hobby);
        let study = delete(BlockType::Study);

        assert_ne!(hobby.title(), study.title());
        assert_ne!(hobby.confirm_text(), study.confirm_text());
        assert!(hobby.message().contains("Guitar"));
        assert!(study.message().contains("cannot be undone"));
    }

    #[test]
    fn test_exam_and_break_share_neutral_copy() {
        assert_eq!(delete(BlockType::Exam).title(), "Delete Block");
        assert_eq!(delete(BlockType::Break).message(), delete(BlockType::Study).message());
    }

    #[test]
    fn test_take_action_closes_dialog() {
        let mut state = ConfirmDialogState::new();
        state.request(delete(BlockType::Study));
        assert!(state.is_open());
        assert_eq!(state.take_action(), Some(delete(BlockType::Study)));
        assert!(!state.is_open());
    }
}
