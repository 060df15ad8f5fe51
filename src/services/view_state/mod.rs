//! Client-local view state: the last day the user looked at.
//!
//! Stored as a small JSON document under a stable key so a restart lands on the
//! same day. Every navigation overwrites it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date::{format_day_key, parse_day_key};

pub const LAST_DAY_KEY: &str = "roadmap_last_day";

pub trait DayKeyStore {
    fn load(&self) -> Option<NaiveDate>;
    fn save(&mut self, day: NaiveDate) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ViewStateSnapshot {
    #[serde(rename = "roadmap_last_day", default)]
    last_day: Option<String>,
}

/// JSON-file store in the application's data directory.
#[derive(Debug, Clone)]
pub struct JsonDayKeyStore {
    path: PathBuf,
}

impl JsonDayKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> Result<ViewStateSnapshot> {
        if !self.path.exists() {
            return Ok(ViewStateSnapshot::default());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read view state from {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to deserialize view state from {}", self.path.display()))
    }
}

impl DayKeyStore for JsonDayKeyStore {
    fn load(&self) -> Option<NaiveDate> {
        match self.read_snapshot() {
            Ok(snapshot) => snapshot.last_day.and_then(|raw| parse_day_key(&raw).ok()),
            Err(err) => {
                log::warn!("Ignoring unreadable view state: {:#}", err);
                None
            }
        }
    }

    fn save(&mut self, day: NaiveDate) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
        let snapshot = ViewStateSnapshot {
            last_day: Some(format_day_key(day)),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write view state to {}", self.path.display()))?;
        Ok(())
    }
}

/// Volatile store for tests and sessions without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryDayKeyStore {
    day: Option<NaiveDate>,
    pub writes: usize,
}

impl MemoryDayKeyStore {
    pub fn with_day(day: NaiveDate) -> Self {
        Self {
            day: Some(day),
            writes: 0,
        }
    }
}

impl DayKeyStore for MemoryDayKeyStore {
    fn load(&self) -> Option<NaiveDate> {
        self.day
    }

    fn save(&mut self, day: NaiveDate) -> Result<()> {
        self.day = Some(day);
        self.writes += 1;
        Ok(())
    }
}
