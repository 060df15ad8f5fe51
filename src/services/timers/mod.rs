//! Cooperative timer registry polled from the UI frame loop.
//!
//! Every timer is owned through a [`TimerHandle`] returned by one of the
//! `start_*` methods. The handle is not `Clone`, and [`Timers::stop`] consumes
//! it, so an owner has to give up its old handle before it can be left holding
//! a new one. That is how the now-indicator and the autoscroll loop are kept
//! to at most one instance each.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Identifies a timer in [`Timers::poll`] results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Ownership token for a running timer.
#[derive(Debug, PartialEq, Eq)]
pub struct TimerHandle(TimerId);

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires every interval until stopped.
    Recurring(Duration),
    /// Fires once, then retires itself.
    Once,
    /// Fires on every poll.
    EveryFrame,
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    kind: TimerKind,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct Timers {
    next_id: u64,
    entries: BTreeMap<TimerId, TimerEntry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_recurring(&mut self, interval: Duration, now: Instant) -> TimerHandle {
        self.insert(TimerKind::Recurring(interval), now + interval)
    }

    pub fn start_once(&mut self, delay: Duration, now: Instant) -> TimerHandle {
        self.insert(TimerKind::Once, now + delay)
    }

    pub fn start_frame_loop(&mut self, now: Instant) -> TimerHandle {
        self.insert(TimerKind::EveryFrame, now)
    }

    /// Cancel a timer. Returns false if it had already retired.
    pub fn stop(&mut self, handle: TimerHandle) -> bool {
        self.entries.remove(&handle.id()).is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn count_of(&self, kind: TimerKind) -> usize {
        self.entries.values().filter(|entry| entry.kind == kind).count()
    }

    /// Collect every timer due at `now`, rescheduling recurring ones and
    /// retiring one-shots.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();
        let mut retired = Vec::new();

        for (id, entry) in self.entries.iter_mut() {
            if entry.due > now {
                continue;
            }
            fired.push(*id);
            match entry.kind {
                TimerKind::Recurring(interval) => {
                    // Skip missed ticks rather than bursting after a stall.
                    entry.due += interval;
                    if entry.due <= now {
                        entry.due = now + interval;
                    }
                }
                TimerKind::Once => retired.push(*id),
                TimerKind::EveryFrame => entry.due = now,
            }
        }

        for id in retired {
            self.entries.remove(&id);
        }
        fired
    }

    /// Time until the next timer is due, for repaint scheduling.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.entries
            .values()
            .map(|entry| entry.due.saturating_duration_since(now))
            .min()
    }

    fn insert(&mut self, kind: TimerKind, due: Instant) -> TimerHandle {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, TimerEntry { kind, due });
        TimerHandle(id)
    }
}
