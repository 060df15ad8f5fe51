// Integration tests for the drag-to-reschedule flow and the persistence gateway
mod fixtures;

use std::sync::Arc;
use std::time::{Duration, Instant};

use fixtures::{at, at_on, day, next_day, study, two_day_roadmap};
use pretty_assertions::assert_eq;
use roadmap_calendar::models::schedule_block::ScheduleBlock;
use roadmap_calendar::models::settings::GridSettings;
use roadmap_calendar::services::gesture::{HitTarget, PointerDrag, TouchDrag};
use roadmap_calendar::services::grid::ScheduleGrid;
use roadmap_calendar::services::mapper::GridScale;
use roadmap_calendar::services::schedule::{
    plan_commit, GatewayEvent, GatewayRequest, GatewayWorker, PersistenceGateway, ScheduleBackend,
    SqliteScheduleBackend,
};
use roadmap_calendar::services::timers::Timers;
use roadmap_calendar::services::view_state::MemoryDayKeyStore;
use roadmap_calendar::ui_egui::EguiScrollSurface;

const SCALE: GridScale = GridScale {
    px_per_hour: 160.0,
    snap_minutes: 15,
};

fn grid_with(blocks: Vec<ScheduleBlock>) -> (ScheduleGrid, Timers) {
    let mut grid = ScheduleGrid::new(GridSettings::default());
    grid.replace_schedule(blocks);
    grid.restore_day(&MemoryDayKeyStore::default(), day());
    let mut timers = Timers::new();
    grid.rebuild(&mut timers, SCALE, at(7, 0), Instant::now());
    (grid, timers)
}

fn sqlite_with(blocks: &[ScheduleBlock]) -> Arc<SqliteScheduleBackend> {
    let backend = SqliteScheduleBackend::in_memory().expect("in-memory backend");
    for block in blocks {
        backend.insert_block(block).expect("insert block");
    }
    Arc::new(backend)
}

#[test]
fn test_pointer_drag_moves_block_forty_five_minutes() {
    // Grid starts at 08:00, so the 09:00 block sits at 160px
    let (mut grid, _timers) = grid_with(vec![study(1, at(9, 0), at(10, 0))]);
    let mut pointer = PointerDrag::new(8.0);

    assert!(pointer.press(&grid, 1, HitTarget::Body, 200.0));
    let preview = pointer.drag(&mut grid, 320.0).expect("lifted");
    assert_eq!(preview.top, 280.0);
    assert_eq!(preview.time_label(), "9:45");

    let commit = pointer.release(&mut grid).expect("commit");
    let placements = plan_commit(&commit);

    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].span.start, at(9, 45));
    assert_eq!(placements[0].span.end, at(10, 45));
    assert!(!placements[0].is_delayed);
    assert!(!grid.has_preview());
}

#[test]
fn test_pointer_drop_pushes_following_block() {
    let (mut grid, _timers) = grid_with(vec![
        study(1, at(9, 0), at(10, 0)),
        study(2, at(10, 15), at(11, 15)),
    ]);
    let mut pointer = PointerDrag::new(8.0);

    pointer.press(&grid, 1, HitTarget::Body, 200.0);
    pointer.drag(&mut grid, 320.0);
    let commit = pointer.release(&mut grid).expect("commit");
    let placements = plan_commit(&commit);

    // Block 1 ends at 440px, so block 2 lands at 448px (10:48)
    assert_eq!(placements.len(), 2);
    assert_eq!(placements[0].id, 1);
    assert_eq!(placements[1].id, 2);
    assert_eq!(placements[1].span.start, at(10, 48));
    assert_eq!(placements[1].span.end, at(11, 48));

    grid.apply_placements(&placements);
    let moved = grid.block(2).unwrap();
    assert_eq!(moved.start_time, Some(at(10, 48)));
}

#[test]
fn test_click_without_movement_commits_nothing() {
    let (mut grid, _timers) = grid_with(vec![study(1, at(9, 0), at(10, 0))]);
    let mut pointer = PointerDrag::new(8.0);

    pointer.press(&grid, 1, HitTarget::Body, 200.0);
    assert!(pointer.drag(&mut grid, 200.0).is_none());
    assert!(pointer.release(&mut grid).is_none());
}

#[test]
fn test_pinned_blocks_do_not_drag() {
    let (grid, _timers) = grid_with(two_day_roadmap());
    let mut pointer = PointerDrag::new(8.0);

    // Break
    assert!(!pointer.press(&grid, 3, HitTarget::Body, 650.0));
    // Completion checkbox on a study block
    assert!(!pointer.press(&grid, 1, HitTarget::CompletionToggle, 170.0));
}

#[test]
fn test_touch_long_press_drag_commits_snapped_time() {
    let settings = GridSettings::default();
    let (mut grid, mut timers) = grid_with(vec![study(1, at(9, 0), at(10, 0))]);
    let mut surface = EguiScrollSurface::new();
    surface.sync(
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 800.0)),
        0.0,
        grid.layout().unwrap().grid_height,
        0.0,
    );
    let mut touch = TouchDrag::new(&settings);
    let start = Instant::now();

    assert!(touch.touch_start(&grid, &mut timers, 1, HitTarget::Body, (100.0, 200.0), start));

    let later = start + Duration::from_millis(settings.long_press_ms + 50);
    let fired = timers.poll(later);
    assert!(touch.on_timers(&fired, &mut grid, &mut surface, &mut timers, later));
    assert_eq!(touch.dragging_block(), Some(1));
    assert!(surface.is_locked());
    assert_eq!(surface.haptic_pulses(), 1);

    // Raw finger tracking; snapping happens on drop
    touch.touch_move(&mut grid, &surface, &mut timers, (100.0, 322.0));
    assert_eq!(grid.preview_top(1), Some(282.0));

    let commit = touch.touch_end(&mut grid, &mut surface, &mut timers).expect("commit");
    let placements = plan_commit(&commit);
    assert_eq!(placements[0].span.start, at(9, 45));
    assert!(!surface.is_locked());
    assert!(!grid.has_preview());
}

#[test]
fn test_touch_cancel_restores_layout() {
    let settings = GridSettings::default();
    let (mut grid, mut timers) = grid_with(vec![study(1, at(9, 0), at(10, 0))]);
    let mut surface = EguiScrollSurface::new();
    surface.sync(
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 800.0)),
        0.0,
        grid.layout().unwrap().grid_height,
        0.0,
    );
    let mut touch = TouchDrag::new(&settings);
    let start = Instant::now();

    touch.touch_start(&grid, &mut timers, 1, HitTarget::Body, (100.0, 200.0), start);
    let later = start + Duration::from_millis(settings.long_press_ms + 50);
    let fired = timers.poll(later);
    touch.on_timers(&fired, &mut grid, &mut surface, &mut timers, later);
    touch.touch_move(&mut grid, &surface, &mut timers, (100.0, 400.0));

    touch.touch_cancel(&mut grid, &mut surface, &mut timers);

    assert_eq!(touch.dragging_block(), None);
    assert!(!grid.has_preview());
    assert!(!surface.is_locked());
    assert_eq!(grid.block(1).unwrap().start_time, Some(at(9, 0)));
}

#[test]
fn test_optimistic_delete_then_refresh() {
    let blocks = vec![study(1, at(9, 0), at(10, 0)), study(2, at(10, 15), at(11, 15))];
    let (mut grid, _timers) = grid_with(blocks.clone());
    let gateway = PersistenceGateway::new(sqlite_with(&blocks));
    let instant = Instant::now();

    assert!(grid.remove_block(2, instant).is_some());
    assert!(grid.block(2).is_none());
    assert_eq!(grid.departing().len(), 1);

    let events = gateway.execute(GatewayRequest::Delete(2));
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], GatewayEvent::Deleted { id: 2, result: Ok(()) }));
    let GatewayEvent::Refreshed(Ok(refreshed)) = &events[1] else {
        panic!("expected a reconciliation refresh, got {:?}", events[1]);
    };
    grid.replace_schedule(refreshed.clone());

    assert_eq!(grid.blocks_for(day()).len(), 1);
    assert_eq!(grid.prune_departing(instant + Duration::from_secs(1)), 1);
}

#[test]
fn test_navigation_clamps_at_both_ends() {
    let (mut grid, _timers) = grid_with(two_day_roadmap());
    let mut store = MemoryDayKeyStore::default();

    assert_eq!(grid.current_day(), Some(day()));
    assert!(!grid.previous_day(&mut store));
    assert!(grid.next_day(&mut store));
    assert_eq!(grid.current_day(), Some(next_day()));
    assert!(!grid.next_day(&mut store));
    assert_eq!(store.writes, 1);

    assert!(grid.jump_to_today(day(), &mut store));
    assert_eq!(grid.current_day(), Some(day()));
}

#[test]
fn test_gateway_commit_round_trip_through_sqlite() {
    let blocks = vec![study(1, at(9, 0), at(10, 0)), study(2, at(10, 15), at(11, 15))];
    let (mut grid, _timers) = grid_with(blocks.clone());
    let backend = sqlite_with(&blocks);
    let mut worker = GatewayWorker::new(PersistenceGateway::new(backend.clone()));

    let mut pointer = PointerDrag::new(8.0);
    pointer.press(&grid, 1, HitTarget::Body, 200.0);
    pointer.drag(&mut grid, 320.0);
    let placements = plan_commit(&pointer.release(&mut grid).unwrap());
    grid.apply_placements(&placements);
    worker.submit(GatewayRequest::Commit(placements));

    let events = worker.drain();
    assert_eq!(worker.in_flight(), 0);
    let report = events
        .iter()
        .find_map(|event| match event {
            GatewayEvent::Committed(report) => Some(report),
            _ => None,
        })
        .expect("commit report");
    assert!(report.is_complete());
    assert_eq!(report.attempted(), 2);

    let stored = backend.fetch_schedule().unwrap();
    let first = stored.iter().find(|b| b.id == 1).unwrap();
    let second = stored.iter().find(|b| b.id == 2).unwrap();
    assert_eq!(first.start_time, Some(at(9, 45)));
    assert_eq!(second.start_time, Some(at(10, 48)));
}

#[test]
fn test_gateway_defer_moves_block_to_next_day() {
    let blocks = two_day_roadmap();
    let gateway = PersistenceGateway::new(sqlite_with(&blocks));

    let events = gateway.execute(GatewayRequest::Defer(2));
    let GatewayEvent::Deferred { result: Ok(moved_to), .. } = &events[0] else {
        panic!("expected deferral, got {:?}", events[0]);
    };
    assert_eq!(*moved_to, next_day());

    let GatewayEvent::Refreshed(Ok(refreshed)) = &events[1] else {
        panic!("expected refresh");
    };
    let deferred = refreshed.iter().find(|b| b.id == 2).unwrap();
    assert_eq!(deferred.start_time, Some(at_on(next_day(), 10, 15)));
    assert!(deferred.is_delayed);
}

#[test]
fn test_update_does_not_reconcile() {
    let blocks = vec![study(1, at(9, 0), at(10, 0))];
    let gateway = PersistenceGateway::new(sqlite_with(&blocks));
    let (mut grid, _timers) = grid_with(blocks);

    let patch = grid.apply_edit(1, "Eigenvalues", at(14, 0)).expect("patch");
    let events = gateway.execute(GatewayRequest::Update { id: 1, patch });

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GatewayEvent::Updated { id: 1, result: Ok(()) }));
}
