//! Edit modal opened by double-clicking (or double-tapping) a block.

use chrono::{NaiveDate, NaiveTime};
use egui::{Context, RichText};

use super::RoadmapApp;
use crate::models::schedule_block::{BlockId, BlockType};

#[derive(Debug, Clone, PartialEq)]
pub struct EditDialogState {
    pub block_id: BlockId,
    pub day: NaiveDate,
    pub block_type: BlockType,
    pub title: String,
    /// Start time as typed, `HH:MM`
    pub start_text: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum EditOutcome {
    Save { title: String, start: NaiveTime },
    Defer,
    Delete,
    Cancel,
}

impl EditDialogState {
    /// Validate the typed fields. The title may be blank; the backend keeps
    /// the task name in that case.
    fn parse_start(&self) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(self.start_text.trim(), "%H:%M")
            .map_err(|_| format!("'{}' is not a valid time (HH:MM)", self.start_text.trim()))
    }

    pub fn can_defer(&self) -> bool {
        self.block_type == BlockType::Study
    }
}

impl RoadmapApp {
    pub(super) fn open_edit_dialog(&mut self, id: BlockId) {
        let Some(block) = self.grid.block(id) else {
            return;
        };
        if !block.block_type.is_editable() {
            return;
        }
        let (Some(span), Some(day)) = (block.span(), block.day_key()) else {
            log::warn!("Block {} has no usable times; not opening editor", id);
            return;
        };

        self.edit_dialog = Some(EditDialogState {
            block_id: id,
            day,
            block_type: block.block_type,
            title: block.display_title().to_string(),
            start_text: span.start.format("%H:%M").to_string(),
            error: None,
        });
    }

    pub(super) fn render_edit_dialog(&mut self, ctx: &Context) {
        let Some(state) = self.edit_dialog.as_mut() else {
            return;
        };

        let mut outcome = None;
        let mut open = true;

        egui::Window::new("Edit Block")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(280.0);

                egui::Grid::new("edit_block_fields")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Title:");
                        ui.text_edit_singleline(&mut state.title);
                        ui.end_row();

                        ui.label("Starts at:");
                        ui.add(egui::TextEdit::singleline(&mut state.start_text).desired_width(60.0));
                        ui.end_row();
                    });

                if let Some(error) = &state.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(error).color(ui.visuals().error_fg_color));
                }

                ui.add_space(10.0);
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        match state.parse_start() {
                            Ok(start) => {
                                outcome = Some(EditOutcome::Save {
                                    title: state.title.clone(),
                                    start,
                                })
                            }
                            Err(message) => state.error = Some(message),
                        }
                    }
                    if state.can_defer() && ui.button("Defer to tomorrow").clicked() {
                        outcome = Some(EditOutcome::Defer);
                    }
                    if ui.button("Delete").clicked() {
                        outcome = Some(EditOutcome::Delete);
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(EditOutcome::Cancel);
                    }
                });
            });

        if !open {
            outcome = Some(EditOutcome::Cancel);
        }
        let Some(outcome) = outcome else {
            return;
        };

        let Some(state) = self.edit_dialog.take() else {
            return;
        };
        match outcome {
            EditOutcome::Save { title, start } => {
                self.save_edit(state.block_id, &title, state.day.and_time(start));
            }
            EditOutcome::Defer => self.defer_block(state.block_id),
            EditOutcome::Delete => self.request_delete(state.block_id),
            EditOutcome::Cancel => {}
        }
    }

    pub(super) fn close_edit_dialog(&mut self) {
        self.edit_dialog = None;
    }
}
