mod confirm;
mod edit_dialog;
mod lifecycle;
mod navigation;
mod shortcuts;
mod sync;
mod toast;

use self::confirm::ConfirmDialogState;
use self::edit_dialog::EditDialogState;
use self::toast::ToastManager;
use crate::models::settings::AppConfig;
use crate::services::gesture::DragController;
use crate::services::grid::ScheduleGrid;
use crate::services::schedule::GatewayWorker;
use crate::services::timers::{TimerHandle, Timers};
use crate::services::view_state::JsonDayKeyStore;
use crate::ui_egui::views::DayGridView;

pub struct RoadmapApp {
    config: AppConfig,
    /// Day-keyed schedule plus the selected day's layout
    grid: ScheduleGrid,
    timers: Timers,
    /// Pointer or touch, chosen once at startup
    controller: DragController,
    worker: GatewayWorker,
    day_store: JsonDayKeyStore,
    day_view: DayGridView,
    edit_dialog: Option<EditDialogState>,
    confirm_dialog: ConfirmDialogState,
    toast_manager: ToastManager,
    /// Refetch scheduled for after an edit's transition
    edit_refresh: Option<TimerHandle>,
    /// Set once the first schedule has arrived and the last day was restored
    loaded: bool,
    backend_label: String,
}

impl eframe::App for RoadmapApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.handle_exit();
    }
}
