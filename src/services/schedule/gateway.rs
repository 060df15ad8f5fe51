//! Persistence gateway: pushes optimistic changes to the backend and pulls the
//! authoritative schedule back afterwards.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;

use crate::models::schedule_block::{BlockId, BlockPatch, ScheduleBlock};

use super::{BackendError, BackendResult, BlockPlacement, ScheduleBackend};

/// Per-block outcome of a commit.
#[derive(Debug, Default)]
pub struct CommitReport {
    pub succeeded: Vec<BlockId>,
    pub failed: Vec<(BlockId, BackendError)>,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequest {
    /// One update per placement, sent concurrently.
    Commit(Vec<BlockPlacement>),
    Update { id: BlockId, patch: BlockPatch },
    Delete(BlockId),
    SetCompleted { id: BlockId, completed: bool },
    Defer(BlockId),
    Refresh,
}

impl GatewayRequest {
    /// Whether the request is followed by a schedule refetch.
    ///
    /// Edits are not: the caller refetches once the edit's transition has
    /// played out.
    pub fn reconciles(&self) -> bool {
        !matches!(self, GatewayRequest::Update { .. } | GatewayRequest::Refresh)
    }
}

#[derive(Debug)]
pub enum GatewayEvent {
    Committed(CommitReport),
    Updated { id: BlockId, result: BackendResult<()> },
    Deleted { id: BlockId, result: BackendResult<()> },
    CompletionSet { id: BlockId, completed: bool, result: BackendResult<()> },
    Deferred { id: BlockId, result: BackendResult<NaiveDate> },
    Refreshed(BackendResult<Vec<ScheduleBlock>>),
}

#[derive(Clone)]
pub struct PersistenceGateway {
    backend: Arc<dyn ScheduleBackend>,
}

impl PersistenceGateway {
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self { backend }
    }

    pub fn refresh(&self) -> BackendResult<Vec<ScheduleBlock>> {
        let result = self.backend.fetch_schedule();
        if let Err(err) = &result {
            log::warn!("Schedule refresh failed, keeping last known state: {}", err);
        }
        result
    }

    /// Send every placement at once. Failures are logged and reported; nothing
    /// is rolled back.
    pub fn commit(&self, placements: &[BlockPlacement]) -> CommitReport {
        let results: Vec<(BlockId, BackendResult<()>)> = thread::scope(|scope| {
            let handles: Vec<_> = placements
                .iter()
                .map(|placement| {
                    let backend = &self.backend;
                    scope.spawn(move || (placement.id, backend.update_block(placement.id, &placement.patch())))
                })
                .collect();
            handles
                .into_iter()
                .zip(placements)
                .map(|(handle, placement)| {
                    handle.join().unwrap_or_else(|_| {
                        (
                            placement.id,
                            Err(BackendError::Transport("update worker panicked".to_string())),
                        )
                    })
                })
                .collect()
        });

        let mut report = CommitReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.succeeded.push(id),
                Err(err) => report.failed.push((id, err)),
            }
        }

        if !report.is_complete() {
            log::warn!(
                "Commit partially failed: {} of {} block updates rejected",
                report.failed.len(),
                report.attempted()
            );
            for (id, err) in &report.failed {
                log::warn!("  block {}: {}", id, err);
            }
        } else {
            log::debug!("Committed {} block updates", report.succeeded.len());
        }
        report
    }

    /// Run a request to completion, followed by a refetch where the request
    /// calls for one. The refetch runs whether or not the request succeeded.
    pub fn execute(&self, request: GatewayRequest) -> Vec<GatewayEvent> {
        let reconcile = request.reconciles();
        let mut events = Vec::with_capacity(2);

        match request {
            GatewayRequest::Commit(placements) => {
                events.push(GatewayEvent::Committed(self.commit(&placements)));
            }
            GatewayRequest::Update { id, patch } => {
                let result = self.backend.update_block(id, &patch);
                log_failure("update", id, &result);
                events.push(GatewayEvent::Updated { id, result });
            }
            GatewayRequest::Delete(id) => {
                let result = self.backend.delete_block(id);
                log_failure("delete", id, &result);
                events.push(GatewayEvent::Deleted { id, result });
            }
            GatewayRequest::SetCompleted { id, completed } => {
                let result = self.backend.set_completed(id, completed);
                log_failure("completion toggle", id, &result);
                events.push(GatewayEvent::CompletionSet { id, completed, result });
            }
            GatewayRequest::Defer(id) => {
                let result = self.backend.defer_block(id);
                log_failure("defer", id, &result);
                events.push(GatewayEvent::Deferred { id, result });
            }
            GatewayRequest::Refresh => {
                events.push(GatewayEvent::Refreshed(self.refresh()));
            }
        }

        if reconcile {
            events.push(GatewayEvent::Refreshed(self.refresh()));
        }
        events
    }
}

fn log_failure<T>(action: &str, id: BlockId, result: &BackendResult<T>) {
    if let Err(err) = result {
        log::warn!("Block {} {} failed: {}", id, action, err);
    }
}

/// Runs gateway requests off the UI thread, one thread per request, and
/// hands their events back through a channel polled each frame.
pub struct GatewayWorker {
    gateway: PersistenceGateway,
    sender: Sender<Vec<GatewayEvent>>,
    receiver: Receiver<Vec<GatewayEvent>>,
    in_flight: usize,
}

impl GatewayWorker {
    pub fn new(gateway: PersistenceGateway) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            gateway,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, request: GatewayRequest) {
        let gateway = self.gateway.clone();
        let sender = self.sender.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let events = gateway.execute(request);
            let _ = sender.send(events);
        });
    }

    /// Everything that finished since the last call, without blocking.
    pub fn try_events(&mut self) -> Vec<GatewayEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    events.extend(batch);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Block until every submitted request has finished.
    pub fn drain(&mut self) -> Vec<GatewayEvent> {
        let mut events = Vec::new();
        while self.in_flight > 0 {
            match self.receiver.recv() {
                Ok(batch) => {
                    self.in_flight -= 1;
                    events.extend(batch);
                }
                Err(_) => break,
            }
        }
        events
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
