use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};

use super::confirm::ConfirmDialogState;
use super::toast::ToastManager;
use super::RoadmapApp;
use crate::models::settings::BackendConfig;
use crate::services::gesture::{DragController, InputCapabilities};
use crate::services::grid::ScheduleGrid;
use crate::services::mapper::GridScale;
use crate::services::schedule::{
    GatewayRequest, GatewayWorker, HttpScheduleBackend, PersistenceGateway, ScheduleBackend,
    SqliteScheduleBackend,
};
use crate::services::settings::SettingsService;
use crate::services::timers::Timers;
use crate::services::view_state::JsonDayKeyStore;
use crate::ui_egui::views::DayGridView;
use crate::utils::date::time_until_midnight;

/// Poll interval while backend requests are outstanding.
const WORKER_POLL: Duration = Duration::from_millis(200);

impl RoadmapApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self> {
        let settings_service = SettingsService::from_environment();
        let config = settings_service.load();
        log::info!("Loaded config from {}", settings_service.config_path().display());

        let backend_config = settings_service.resolve_backend(&config);
        let (backend, backend_label) = match build_backend(&backend_config) {
            Ok(backend) => backend,
            Err(e) => {
                log::error!("Failed to open schedule backend: {:#}; falling back to an in-memory store", e);
                fallback_backend()?
            }
        };
        log::info!("Schedule backend: {}", backend_label);

        let capabilities = InputCapabilities::probe(config.input_mode);
        let controller = DragController::for_capabilities(capabilities, &config.grid);
        let day_store = JsonDayKeyStore::new(settings_service.view_state_path());

        let mut worker = GatewayWorker::new(PersistenceGateway::new(backend));
        worker.submit(GatewayRequest::Refresh);

        Ok(Self {
            grid: ScheduleGrid::new(config.grid.clone()),
            day_view: DayGridView::new(&config.grid),
            config,
            timers: Timers::new(),
            controller,
            worker,
            day_store,
            edit_dialog: None,
            confirm_dialog: ConfirmDialogState::new(),
            toast_manager: ToastManager::new(),
            edit_refresh: None,
            loaded: false,
            backend_label,
        })
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let instant = Instant::now();
        let now = Local::now().naive_local();

        self.process_gateway_events(now.date());
        self.process_touch_input(ctx, instant);
        self.process_timers(instant, now);
        self.grid.roll_over(now);
        self.grid.prune_departing(instant);

        self.handle_keyboard_shortcuts(ctx, now.date());

        egui::TopBottomPanel::top("day_navigation").show(ctx, |ui| {
            self.render_navigation_bar(ui, now.date());
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_bar(ui);
        });

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            let scale = GridScale::for_viewport(ui.available_width(), self.grid.settings());
            if self.grid.needs_rebuild(scale) {
                self.grid.rebuild(&mut self.timers, scale, now, instant);
            }
            actions = self
                .day_view
                .show(ui, &mut self.grid, &mut self.controller, instant);
        });
        self.apply_grid_actions(actions);

        self.render_edit_dialog(ctx);
        self.handle_confirm_dialog(ctx, instant);

        let is_dark = ctx.style().visuals.dark_mode;
        self.toast_manager.render(ctx, is_dark);

        self.schedule_repaint(ctx, instant, now);
    }

    /// Wake up again exactly when something needs to happen.
    fn schedule_repaint(&self, ctx: &egui::Context, instant: Instant, now: NaiveDateTime) {
        if self.controller.is_dragging() || !self.grid.departing().is_empty() {
            ctx.request_repaint();
            return;
        }
        // The date change flips which day is "today" even with no timer running
        let midnight = time_until_midnight(now);
        let mut wait = self
            .timers
            .time_until_next(instant)
            .map_or(midnight, |next| next.min(midnight));
        if self.worker.in_flight() > 0 {
            wait = wait.min(WORKER_POLL);
        }
        ctx.request_repaint_after(wait);
    }

    pub(super) fn handle_exit(&mut self) {
        self.grid.teardown(&mut self.timers);
        if self.worker.in_flight() > 0 {
            log::info!("Waiting for {} schedule request(s) to finish", self.worker.in_flight());
            self.worker.drain();
        }
    }
}

fn build_backend(config: &BackendConfig) -> Result<(Arc<dyn ScheduleBackend>, String)> {
    match config {
        BackendConfig::Http { base_url, token } => {
            let backend = HttpScheduleBackend::new(base_url, token.clone())?;
            Ok((Arc::new(backend), base_url.clone()))
        }
        BackendConfig::Sqlite { path } => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
            }
            let backend = SqliteScheduleBackend::open(&path.to_string_lossy())?;
            Ok((Arc::new(backend), path.display().to_string()))
        }
    }
}

fn fallback_backend() -> Result<(Arc<dyn ScheduleBackend>, String)> {
    let backend = SqliteScheduleBackend::in_memory().context("Failed to open in-memory schedule store")?;
    Ok((Arc::new(backend), "in-memory".to_string()))
}
