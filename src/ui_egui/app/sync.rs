//! Wiring between the grid, the drag controllers and the persistence gateway.
//!
//! Every mutation follows the same two steps: change the in-memory schedule
//! right away, then hand the backend call to the gateway worker, whose
//! follow-up refresh replaces the schedule wholesale.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime};

use super::confirm::ConfirmAction;
use super::RoadmapApp;
use crate::models::schedule_block::BlockId;
use crate::services::gesture::DragController;
use crate::services::schedule::{plan_commit, GatewayEvent, GatewayRequest};
use crate::ui_egui::views::GridAction;

impl RoadmapApp {
    pub(super) fn process_gateway_events(&mut self, today: NaiveDate) {
        for event in self.worker.try_events() {
            match event {
                GatewayEvent::Refreshed(Ok(blocks)) => {
                    self.grid.replace_schedule(blocks);
                    if !self.loaded {
                        self.grid.restore_day(&self.day_store, today);
                        self.loaded = true;
                    }
                }
                GatewayEvent::Refreshed(Err(_)) => {
                    // Logged by the gateway; background refreshes retry, so only nag once a minute
                    self.toast_manager
                        .warning_throttled("Could not refresh the schedule", Instant::now());
                }
                GatewayEvent::Committed(report) => {
                    if !report.is_complete() {
                        self.toast_manager.error(format!(
                            "{} of {} block moves were not saved",
                            report.failed.len(),
                            report.attempted()
                        ));
                    }
                }
                GatewayEvent::Updated { id, result } => {
                    if let Err(e) = result {
                        self.toast_manager.error(format!("Failed to save block {}: {}", id, e));
                    }
                    self.schedule_edit_refresh(Instant::now());
                }
                GatewayEvent::Deleted { result: Err(e), .. } => {
                    self.toast_manager.error(format!("Failed to delete block: {}", e));
                }
                GatewayEvent::CompletionSet { result: Err(e), .. } => {
                    self.toast_manager.error(format!("Failed to update block: {}", e));
                }
                GatewayEvent::Deferred { result, .. } => match result {
                    Ok(day) => self
                        .toast_manager
                        .success(format!("Moved to {}", day.format("%a %d %b"))),
                    Err(e) => self.toast_manager.error(format!("Failed to defer block: {}", e)),
                },
                GatewayEvent::Deleted { .. } | GatewayEvent::CompletionSet { .. } => {}
            }
        }
    }

    /// Edits refetch once their transition has played out.
    fn schedule_edit_refresh(&mut self, instant: Instant) {
        if let Some(handle) = self.edit_refresh.take() {
            self.timers.stop(handle);
        }
        let delay = Duration::from_millis(self.grid.settings().transition_ms);
        self.edit_refresh = Some(self.timers.start_once(delay, instant));
    }

    pub(super) fn process_touch_input(&mut self, ctx: &egui::Context, instant: Instant) {
        let DragController::Touch(touch) = &mut self.controller else {
            return;
        };
        let actions = self
            .day_view
            .handle_touch_events(ctx, &mut self.grid, touch, &mut self.timers, instant);
        self.apply_grid_actions(actions);
    }

    pub(super) fn process_timers(&mut self, instant: Instant, now: NaiveDateTime) {
        let fired = self.timers.poll(instant);
        if fired.is_empty() {
            return;
        }

        for id in &fired {
            self.grid.on_timer(*id, now);
        }

        if let DragController::Touch(touch) = &mut self.controller {
            touch.on_timers(
                &fired,
                &mut self.grid,
                self.day_view.surface_mut(),
                &mut self.timers,
                instant,
            );
        }

        let refresh_due = self
            .edit_refresh
            .as_ref()
            .is_some_and(|handle| fired.contains(&handle.id()));
        if refresh_due {
            if let Some(handle) = self.edit_refresh.take() {
                self.timers.stop(handle);
            }
            self.worker.submit(GatewayRequest::Refresh);
        }
    }

    pub(super) fn apply_grid_actions(&mut self, actions: Vec<GridAction>) {
        for action in actions {
            match action {
                GridAction::Commit(commit) => {
                    let placements = plan_commit(&commit);
                    if placements.is_empty() {
                        continue;
                    }
                    log::debug!(
                        "Committing block {} with {} shifted block(s)",
                        commit.moved_id,
                        placements.len() - 1
                    );
                    self.grid.apply_placements(&placements);
                    self.worker.submit(GatewayRequest::Commit(placements));
                }
                GridAction::Edit(id) => self.open_edit_dialog(id),
                GridAction::SetCompleted { id, completed } => self.set_completed(id, completed),
                GridAction::RequestDelete(id) => self.request_delete(id),
            }
        }
    }

    fn set_completed(&mut self, id: BlockId, completed: bool) {
        if self.grid.set_completed(id, completed) {
            self.worker.submit(GatewayRequest::SetCompleted { id, completed });
        }
    }

    pub(super) fn request_delete(&mut self, id: BlockId) {
        if let Some(block) = self.grid.block(id) {
            self.confirm_dialog.request(ConfirmAction::DeleteBlock {
                block_id: id,
                block_title: block.display_title().to_string(),
                block_type: block.block_type,
            });
        }
    }

    /// Optimistic removal followed by the backend delete.
    pub(super) fn delete_block(&mut self, id: BlockId, instant: Instant) {
        if self.grid.remove_block(id, instant).is_some() {
            log::info!("Deleting block {}", id);
        }
        self.worker.submit(GatewayRequest::Delete(id));
    }

    pub(super) fn request_refresh(&mut self) {
        log::debug!("Manual schedule refresh");
        self.worker.submit(GatewayRequest::Refresh);
    }

    pub(super) fn defer_block(&mut self, id: BlockId) {
        log::info!("Deferring block {} to the next day", id);
        self.worker.submit(GatewayRequest::Defer(id));
    }

    pub(super) fn save_edit(&mut self, id: BlockId, title: &str, new_start: NaiveDateTime) {
        match self.grid.apply_edit(id, title, new_start) {
            Some(patch) => self.worker.submit(GatewayRequest::Update { id, patch }),
            None => log::warn!("Edit of block {} was not applied", id),
        }
    }
}
