use chrono::NaiveDate;

use super::RoadmapApp;

impl RoadmapApp {
    pub(super) fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context, today: NaiveDate) {
        let (escape, left, right, today_key, refresh) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::T) && !i.modifiers.any(),
                i.modifiers.command && i.key_pressed(egui::Key::R),
            )
        });

        // The confirm dialog handles its own Escape
        if escape && self.edit_dialog.is_some() && !self.confirm_dialog.is_open() {
            self.close_edit_dialog();
            return;
        }

        let dialog_open = self.edit_dialog.is_some() || self.confirm_dialog.is_open();
        if dialog_open || self.controller.is_dragging() || ctx.wants_keyboard_input() {
            return;
        }

        if left {
            self.navigate_previous();
        }
        if right {
            self.navigate_next();
        }
        if today_key {
            self.jump_to_today(today);
        }
        if refresh {
            self.request_refresh();
        }
    }
}
