use chrono::NaiveDate;
use egui::RichText;

use super::RoadmapApp;
use crate::models::settings::InputMode;
use crate::ui_egui::views::exam_legend;

impl RoadmapApp {
    pub(super) fn navigate_previous(&mut self) {
        if self.grid.previous_day(&mut self.day_store) {
            self.day_view.reset_gestures();
        }
    }

    pub(super) fn navigate_next(&mut self) {
        if self.grid.next_day(&mut self.day_store) {
            self.day_view.reset_gestures();
        }
    }

    pub(super) fn jump_to_today(&mut self, today: NaiveDate) {
        if self.grid.jump_to_today(today, &mut self.day_store) {
            self.day_view.reset_gestures();
        }
    }

    pub(super) fn render_navigation_bar(&mut self, ui: &mut egui::Ui, today: NaiveDate) {
        let total = self.grid.day_keys().len();
        let index = self.grid.current_day_index();
        let dragging = self.controller.is_dragging();

        ui.horizontal(|ui| {
            let can_go_back = total > 0 && index > 0 && !dragging;
            if ui.add_enabled(can_go_back, egui::Button::new("◀")).clicked() {
                self.navigate_previous();
            }

            let label = day_label(self.grid.current_day(), today);
            ui.label(RichText::new(label).strong().size(16.0));

            let can_go_forward = index + 1 < total && !dragging;
            if ui.add_enabled(can_go_forward, egui::Button::new("▶")).clicked() {
                self.navigate_next();
            }

            ui.separator();
            if ui.add_enabled(total > 0 && !dragging, egui::Button::new("Today")).clicked() {
                self.jump_to_today(today);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if total > 0 {
                    ui.label(RichText::new(format!("{} / {}", index + 1, total)).weak());
                }
            });
        });
    }

    pub(super) fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Backend: {}", self.backend_label)).small());
            ui.separator();

            let mode = match (self.config.input_mode, self.controller.is_touch()) {
                (InputMode::Auto, true) => "auto (touch)",
                (InputMode::Auto, false) => "auto (pointer)",
                (InputMode::Pointer, _) => "pointer",
                (InputMode::Touch, _) => "touch",
            };
            ui.label(RichText::new(format!("Input: {}", mode)).small());

            if !self.grid.exams().is_empty() {
                ui.separator();
                exam_legend(ui, self.grid.exams());
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let pending = self.worker.in_flight();
                if pending > 0 {
                    ui.spinner();
                    ui.label(RichText::new(format!("Saving {}…", pending)).small());
                } else if self.controller.is_dragging() {
                    ui.label(RichText::new("Dragging").small().italics());
                }
            });
        });
    }
}

/// Header text for the selected day.
fn day_label(day: Option<NaiveDate>, today: NaiveDate) -> String {
    match day {
        None => "No schedule".to_string(),
        Some(day) if day == today => format!("TODAY · {}", day.format("%d %b")),
        Some(day) => day.format("%A %d %b %Y").to_string(),
    }
}
