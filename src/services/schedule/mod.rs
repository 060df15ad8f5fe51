// Schedule service module
// Backend seam for fetching and mutating schedule blocks

pub mod gateway;
pub mod http;
pub mod plan;
pub mod sqlite;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::schedule_block::{BlockId, BlockPatch, ScheduleBlock};

pub use gateway::{CommitReport, GatewayEvent, GatewayRequest, GatewayWorker, PersistenceGateway};
pub use http::HttpScheduleBackend;
pub use plan::{place_block, plan_commit, BlockPlacement};
pub use sqlite::SqliteScheduleBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("block {0} not found")]
    NotFound(BlockId),
    #[error("{action} failed with HTTP status {status}")]
    Status { action: &'static str, status: u16 },
    #[error("network error: {0}")]
    Transport(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for BackendError {
    fn from(err: rusqlite::Error) -> Self {
        BackendError::Storage(err.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Remote (or local) store of the user's schedule.
///
/// Calls block; the gateway runs them off the UI thread.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleBackend: Send + Sync {
    fn fetch_schedule(&self) -> BackendResult<Vec<ScheduleBlock>>;
    fn update_block(&self, id: BlockId, patch: &BlockPatch) -> BackendResult<()>;
    fn delete_block(&self, id: BlockId) -> BackendResult<()>;
    fn set_completed(&self, id: BlockId, completed: bool) -> BackendResult<()>;
    /// Move a block to the same time on the next day. Returns the new day.
    fn defer_block(&self, id: BlockId) -> BackendResult<NaiveDate>;
}
