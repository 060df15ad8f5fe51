//! Day-paged schedule state behind the calendar grid.
//!
//! [`ScheduleGrid`] owns the day→blocks map, the selected day and the laid-out
//! view of that day. Drag controllers read the layout and hand their results
//! back through [`ScheduleGrid::apply_placements`]; the gateway's refreshes
//! come back through [`ScheduleGrid::replace_schedule`].

pub mod layout;

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::schedule_block::{BlockId, BlockPatch, ScheduleBlock};
use crate::models::settings::GridSettings;
use crate::services::mapper::GridScale;
use crate::services::schedule::plan::BlockPlacement;
use crate::services::timers::{TimerHandle, TimerId, Timers};
use crate::services::view_state::DayKeyStore;

pub use layout::{grid_start_hour, layout_day, DayLayout, HourLabel, PositionedBlock, MAX_START_HOUR};

/// A block removed optimistically, kept around while it fades out.
#[derive(Debug, Clone)]
pub struct DepartingBlock {
    pub positioned: PositionedBlock,
    pub started: Instant,
}

impl DepartingBlock {
    /// 0.0 when removal starts, 1.0 once the transition has finished.
    pub fn progress(&self, now: Instant, transition: Duration) -> f32 {
        if transition.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (elapsed / transition.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// One exam in the schedule. Its position in [`ScheduleGrid::exams`] is the
/// exam's colour slot on every day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamEntry {
    pub id: i64,
    pub name: Option<String>,
}

impl ExamEntry {
    pub fn label(&self) -> String {
        match self.name.as_deref() {
            Some(name) => name.to_string(),
            None => format!("Exam {}", self.id),
        }
    }
}

/// Distinct exams across all blocks, ordered by id.
fn collect_exams(blocks_by_day: &BTreeMap<NaiveDate, Vec<ScheduleBlock>>) -> Vec<ExamEntry> {
    let mut exams: BTreeMap<i64, Option<String>> = BTreeMap::new();
    for block in blocks_by_day.values().flatten() {
        let Some(id) = block.exam() else {
            continue;
        };
        let name = exams.entry(id).or_default();
        if name.is_none() {
            *name = block.exam_name.clone().filter(|name| !name.trim().is_empty());
        }
    }
    exams.into_iter().map(|(id, name)| ExamEntry { id, name }).collect()
}

#[derive(Debug)]
pub struct ScheduleGrid {
    settings: GridSettings,
    blocks_by_day: BTreeMap<NaiveDate, Vec<ScheduleBlock>>,
    day_keys: Vec<NaiveDate>,
    exams: Vec<ExamEntry>,
    current_day_index: usize,
    layout: Option<DayLayout>,
    last_now: Option<NaiveDateTime>,
    preview: HashMap<BlockId, f32>,
    departing: Vec<DepartingBlock>,
    now_timer: Option<TimerHandle>,
    dirty: bool,
}

impl ScheduleGrid {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            settings,
            blocks_by_day: BTreeMap::new(),
            day_keys: Vec::new(),
            exams: Vec::new(),
            current_day_index: 0,
            layout: None,
            last_now: None,
            preview: HashMap::new(),
            departing: Vec::new(),
            now_timer: None,
            dirty: true,
        }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    // ---- data ----

    /// Replace the whole schedule with an authoritative list.
    ///
    /// Never merges: anything absent from `blocks` is gone afterwards, which is
    /// what keeps deleted blocks from coming back. The selected day is kept if
    /// it still exists, otherwise the nearest remaining day is selected.
    pub fn replace_schedule(&mut self, blocks: Vec<ScheduleBlock>) {
        let previous_day = self.current_day();

        let mut by_day: BTreeMap<NaiveDate, Vec<ScheduleBlock>> = BTreeMap::new();
        for block in blocks {
            match block.day_key() {
                Some(day) => by_day.entry(day).or_default().push(block),
                None => log::warn!("Dropping block {} with no day and no start time", block.id),
            }
        }
        for day_blocks in by_day.values_mut() {
            day_blocks.sort_by_key(|block| (block.start_time, block.id));
        }

        self.day_keys = by_day.keys().copied().collect();
        self.exams = collect_exams(&by_day);
        self.blocks_by_day = by_day;
        self.current_day_index = match previous_day {
            Some(day) => self.nearest_index(day),
            None => 0,
        };

        let resurrected: Vec<BlockId> = self
            .departing
            .iter()
            .map(|departing| departing.positioned.id())
            .filter(|id| self.contains_block(*id))
            .collect();
        self.departing
            .retain(|departing| !resurrected.contains(&departing.positioned.id()));
        self.preview.clear();
        self.dirty = true;

        log::debug!(
            "Schedule replaced: {} days, {} blocks",
            self.day_keys.len(),
            self.blocks_by_day.values().map(Vec::len).sum::<usize>()
        );
    }

    pub fn day_keys(&self) -> &[NaiveDate] {
        &self.day_keys
    }

    pub fn exams(&self) -> &[ExamEntry] {
        &self.exams
    }

    /// Colour slot of an exam. Stable across days for a given schedule.
    pub fn exam_index(&self, exam_id: i64) -> Option<usize> {
        self.exams.binary_search_by_key(&exam_id, |exam| exam.id).ok()
    }

    pub fn current_day_index(&self) -> usize {
        self.current_day_index
    }

    pub fn current_day(&self) -> Option<NaiveDate> {
        self.day_keys.get(self.current_day_index).copied()
    }

    pub fn blocks_for(&self, day: NaiveDate) -> &[ScheduleBlock] {
        self.blocks_by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn block(&self, id: BlockId) -> Option<&ScheduleBlock> {
        self.blocks_by_day
            .values()
            .flat_map(|blocks| blocks.iter())
            .find(|block| block.id == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut ScheduleBlock> {
        self.blocks_by_day
            .values_mut()
            .flat_map(|blocks| blocks.iter_mut())
            .find(|block| block.id == id)
    }

    fn contains_block(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Index of `day`, or of the first later day, or the last day.
    fn nearest_index(&self, day: NaiveDate) -> usize {
        match self.day_keys.binary_search(&day) {
            Ok(index) => index,
            Err(index) => index.min(self.day_keys.len().saturating_sub(1)),
        }
    }

    // ---- navigation ----

    /// Select the persisted day if the schedule has it, otherwise the first day
    /// at or after `today`, otherwise the last day.
    pub fn restore_day(&mut self, store: &dyn DayKeyStore, today: NaiveDate) {
        if self.day_keys.is_empty() {
            return;
        }
        let index = match store.load() {
            Some(saved) if self.day_keys.binary_search(&saved).is_ok() => self.nearest_index(saved),
            _ => self.nearest_index(today),
        };
        self.set_index(index);
    }

    /// Advance one day. No-op on the last day.
    pub fn next_day(&mut self, store: &mut dyn DayKeyStore) -> bool {
        if self.current_day_index + 1 >= self.day_keys.len() {
            return false;
        }
        self.navigate_to(self.current_day_index + 1, store)
    }

    /// Go back one day. No-op on the first day.
    pub fn previous_day(&mut self, store: &mut dyn DayKeyStore) -> bool {
        if self.current_day_index == 0 || self.day_keys.is_empty() {
            return false;
        }
        self.navigate_to(self.current_day_index - 1, store)
    }

    /// Today, or the next scheduled day after it.
    pub fn jump_to_today(&mut self, today: NaiveDate, store: &mut dyn DayKeyStore) -> bool {
        if self.day_keys.is_empty() {
            return false;
        }
        let index = self.nearest_index(today);
        self.navigate_to(index, store)
    }

    fn navigate_to(&mut self, index: usize, store: &mut dyn DayKeyStore) -> bool {
        let Some(day) = self.day_keys.get(index).copied() else {
            return false;
        };
        if index == self.current_day_index {
            return false;
        }
        self.set_index(index);
        if let Err(err) = store.save(day) {
            log::warn!("Failed to persist last viewed day {}: {:#}", day, err);
        }
        true
    }

    fn set_index(&mut self, index: usize) {
        if index != self.current_day_index {
            self.preview.clear();
            self.departing.clear();
        }
        self.current_day_index = index;
        self.dirty = true;
    }

    // ---- rendering ----

    /// Whether the layout is stale for this scale.
    pub fn needs_rebuild(&self, scale: GridScale) -> bool {
        self.dirty
            || self
                .layout
                .as_ref()
                .map_or(true, |layout| layout.scale != scale)
    }

    /// Mark the layout stale once the wall-clock date no longer matches the
    /// day the layout was built as "today" (or not). Returns true when it did.
    pub fn roll_over(&mut self, now: NaiveDateTime) -> bool {
        let stale = self
            .layout
            .as_ref()
            .is_some_and(|layout| layout.is_today != (layout.day == now.date()));
        if stale {
            log::debug!("Date changed to {}, relaying out", now.date());
            self.dirty = true;
        }
        stale
    }

    /// Lay out the selected day and (re)start the now-indicator timer.
    ///
    /// Any previous timer is stopped before a new one is started, so however
    /// often this runs there is at most one now-indicator timer.
    pub fn rebuild(&mut self, timers: &mut Timers, scale: GridScale, now: NaiveDateTime, instant: Instant) {
        if let Some(handle) = self.now_timer.take() {
            timers.stop(handle);
        }

        self.last_now = Some(now);
        self.relayout(scale);
        self.dirty = false;

        if self.layout.as_ref().is_some_and(|layout| layout.is_today) {
            let interval = Duration::from_secs(self.settings.now_tick_secs);
            self.now_timer = Some(timers.start_recurring(interval, instant));
        }
    }

    fn relayout(&mut self, scale: GridScale) {
        let now = self.last_now.unwrap_or_else(|| NaiveDateTime::new(NaiveDate::MIN, NaiveTime::MIN));
        self.layout = self
            .current_day()
            .map(|day| layout_day(day, self.blocks_for(day), scale, now));
    }

    fn relayout_in_place(&mut self) {
        if let Some(scale) = self.layout.as_ref().map(|layout| layout.scale) {
            self.relayout(scale);
        }
    }

    /// Handle a fired timer. Returns true if it was the now-indicator.
    pub fn on_timer(&mut self, id: TimerId, now: NaiveDateTime) -> bool {
        if self.now_timer_id() != Some(id) {
            return false;
        }
        if self.roll_over(now) {
            return true;
        }
        self.last_now = Some(now);
        if let Some(layout) = self.layout.as_mut() {
            layout.now_offset = layout.now_offset_for(now);
        }
        true
    }

    pub fn now_timer_id(&self) -> Option<TimerId> {
        self.now_timer.as_ref().map(TimerHandle::id)
    }

    /// Stop the grid's timers when the view goes away.
    pub fn teardown(&mut self, timers: &mut Timers) {
        if let Some(handle) = self.now_timer.take() {
            timers.stop(handle);
        }
        self.layout = None;
        self.dirty = true;
    }

    pub fn layout(&self) -> Option<&DayLayout> {
        self.layout.as_ref()
    }

    // ---- drag preview ----

    /// Replace the transient positions shown while a drag is in progress.
    pub fn set_preview(&mut self, positions: impl IntoIterator<Item = (BlockId, f32)>) {
        self.preview = positions.into_iter().collect();
    }

    pub fn clear_preview(&mut self) {
        self.preview.clear();
    }

    /// Where a block should be painted right now.
    pub fn preview_top(&self, id: BlockId) -> Option<f32> {
        self.preview.get(&id).copied()
    }

    pub fn has_preview(&self) -> bool {
        !self.preview.is_empty()
    }

    // ---- optimistic mutations ----

    /// Move blocks to their committed times ahead of the backend.
    pub fn apply_placements(&mut self, placements: &[BlockPlacement]) {
        for placement in placements {
            match self.block_mut(placement.id) {
                Some(block) => {
                    block.set_span(placement.span);
                    block.is_delayed = placement.is_delayed;
                }
                None => log::warn!("Placement for unknown block {}", placement.id),
            }
        }
        self.regroup();
        self.preview.clear();
        self.relayout_in_place();
    }

    /// A drag can move a block past midnight, which changes its day key.
    fn regroup(&mut self) {
        let moved: Vec<ScheduleBlock> = self
            .blocks_by_day
            .iter_mut()
            .flat_map(|(day, blocks)| {
                let (stay, go): (Vec<_>, Vec<_>) = blocks
                    .drain(..)
                    .partition(|block| block.day_key() == Some(*day));
                *blocks = stay;
                go
            })
            .collect();
        for block in moved {
            if let Some(day) = block.day_key() {
                self.blocks_by_day.entry(day).or_default().push(block);
            }
        }
        for blocks in self.blocks_by_day.values_mut() {
            blocks.sort_by_key(|block| (block.start_time, block.id));
        }
        let current = self.current_day();
        self.day_keys = self.blocks_by_day.keys().copied().collect();
        if let Some(day) = current {
            self.current_day_index = self.nearest_index(day);
        }
    }

    /// Take a block off the grid immediately; it lingers in
    /// [`ScheduleGrid::departing`] until its fade-out finishes.
    pub fn remove_block(&mut self, id: BlockId, instant: Instant) -> Option<ScheduleBlock> {
        let positioned = self
            .layout
            .as_ref()
            .and_then(|layout| layout.block(id))
            .cloned();

        let mut removed = None;
        for blocks in self.blocks_by_day.values_mut() {
            if let Some(index) = blocks.iter().position(|block| block.id == id) {
                removed = Some(blocks.remove(index));
                break;
            }
        }

        if let Some(layout) = self.layout.as_mut() {
            layout.blocks.retain(|positioned| positioned.id() != id);
        }
        self.preview.remove(&id);
        if let Some(positioned) = positioned {
            self.departing.push(DepartingBlock {
                positioned,
                started: instant,
            });
        }
        removed
    }

    pub fn departing(&self) -> &[DepartingBlock] {
        &self.departing
    }

    /// Drop removal animations that have finished. Returns how many were dropped.
    pub fn prune_departing(&mut self, instant: Instant) -> usize {
        let transition = Duration::from_millis(self.settings.transition_ms);
        let before = self.departing.len();
        self.departing
            .retain(|departing| departing.progress(instant, transition) < 1.0);
        before - self.departing.len()
    }

    pub fn set_completed(&mut self, id: BlockId, completed: bool) -> bool {
        let Some(block) = self.block_mut(id) else {
            return false;
        };
        block.completed = completed;
        if let Some(positioned) = self
            .layout
            .as_mut()
            .and_then(|layout| layout.blocks.iter_mut().find(|positioned| positioned.id() == id))
        {
            positioned.block.completed = completed;
            positioned.draggable = positioned.block.is_draggable();
        }
        true
    }

    /// Apply a title/start-time edit locally and return the patch to send.
    ///
    /// The block keeps its length. It is flagged delayed when the new end runs
    /// past midnight of its day.
    pub fn apply_edit(&mut self, id: BlockId, title: &str, new_start: NaiveDateTime) -> Option<BlockPatch> {
        let block = self.block(id)?;
        if !block.block_type.is_editable() {
            log::debug!("Ignoring edit of fixed block {}", id);
            return None;
        }
        let span = block.span()?.moved_to(new_start);
        let midnight = new_start.date().succ_opt()?.and_time(NaiveTime::MIN);
        let patch = BlockPatch::reschedule(span, span.end > midnight).with_title(title.trim());

        if let Some(block) = self.block_mut(id) {
            patch.apply_to(block);
        }
        self.regroup();
        self.relayout_in_place();
        Some(patch)
    }
}
