// Schedule block model
// A scheduled interval on the study roadmap (study session, break, hobby, exam)

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::date::serde_local;

pub type BlockId = i64;

/// Kind of block, matching the backend vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Study,
    Break,
    Hobby,
    Exam,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Study => "study",
            BlockType::Break => "break",
            BlockType::Hobby => "hobby",
            BlockType::Exam => "exam",
        }
    }

    /// Breaks are pinned by the roadmap generator and exams are fixed events.
    pub fn is_draggable(&self) -> bool {
        matches!(self, BlockType::Study | BlockType::Hobby)
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self, BlockType::Break)
    }
}

impl std::str::FromStr for BlockType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "study" => Ok(BlockType::Study),
            "break" => Ok(BlockType::Break),
            "hobby" => Ok(BlockType::Hobby),
            "exam" => Ok(BlockType::Exam),
            other => Err(format!("Unknown block type '{}'", other)),
        }
    }
}

/// A block as delivered by the schedule backend.
///
/// `start_time`/`end_time` are optional because rows can arrive without them;
/// such blocks stay in the data set but have no [`BlockSpan`] and are never laid
/// out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: BlockId,
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub block_type: BlockType,
    #[serde(default, deserialize_with = "serde_local::deserialize_day")]
    pub day_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "serde_local::deserialize_timestamp",
        serialize_with = "serde_local::serialize_timestamp"
    )]
    pub start_time: Option<NaiveDateTime>,
    #[serde(
        default,
        deserialize_with = "serde_local::deserialize_timestamp",
        serialize_with = "serde_local::serialize_timestamp"
    )]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "serde_local::deserialize_flag")]
    pub completed: bool,
    #[serde(default, deserialize_with = "serde_local::deserialize_flag")]
    pub is_delayed: bool,
    #[serde(default)]
    pub exam_id: Option<i64>,
    #[serde(default, alias = "task_title")]
    pub title: String,
    #[serde(default)]
    pub exam_name: Option<String>,
}

/// Validated start/end pair of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BlockSpan {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Same length, new start.
    pub fn moved_to(&self, start: NaiveDateTime) -> Self {
        Self {
            start,
            end: start + self.duration(),
        }
    }
}

impl ScheduleBlock {
    pub fn new(
        id: BlockId,
        block_type: BlockType,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, String> {
        let title = title.into();
        if end <= start {
            return Err("Block end time must be after start time".to_string());
        }

        Ok(Self {
            id,
            task_id: None,
            block_type,
            day_date: Some(start.date()),
            start_time: Some(start),
            end_time: Some(end),
            completed: false,
            is_delayed: false,
            exam_id: None,
            title,
            exam_name: None,
        })
    }

    /// The block's span, if it can be positioned at all.
    pub fn span(&self) -> Option<BlockSpan> {
        BlockSpan::new(self.start_time?, self.end_time?)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.span().map(|span| span.duration())
    }

    /// Grid key: `day_date`, falling back to the start date for rows that
    /// omit it.
    pub fn day_key(&self) -> Option<NaiveDate> {
        self.day_date.or_else(|| self.start_time.map(|start| start.date()))
    }

    /// Backend rows use `-1` as "no exam".
    pub fn exam(&self) -> Option<i64> {
        self.exam_id.filter(|id| *id >= 0)
    }

    /// Completed blocks stay where they are.
    pub fn is_draggable(&self) -> bool {
        self.block_type.is_draggable() && !self.completed
    }

    /// Replace the span and keep `day_date` in step with the new start.
    pub fn set_span(&mut self, span: BlockSpan) {
        self.start_time = Some(span.start);
        self.end_time = Some(span.end);
        self.day_date = Some(span.start.date());
    }

    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            match self.block_type {
                BlockType::Study => "Study session",
                BlockType::Break => "Break",
                BlockType::Hobby => "Hobby time",
                BlockType::Exam => "Exam",
            }
        } else {
            trimmed
        }
    }
}

/// Partial update sent to the backend for a single block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockPatch {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_local::serialize_timestamp"
    )]
    pub start_time: Option<NaiveDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_local::serialize_timestamp"
    )]
    pub end_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_delayed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
}

impl BlockPatch {
    pub fn reschedule(span: BlockSpan, is_delayed: bool) -> Self {
        Self {
            start_time: Some(span.start),
            end_time: Some(span.end),
            is_delayed: Some(is_delayed),
            task_title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task_title = Some(title.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.start_time.is_none()
            && self.end_time.is_none()
            && self.is_delayed.is_none()
            && self.task_title.is_none()
    }

    /// Apply the patch to a local copy, as the backend would.
    pub fn apply_to(&self, block: &mut ScheduleBlock) {
        if let Some(start) = self.start_time {
            block.start_time = Some(start);
            block.day_date = Some(start.date());
        }
        if let Some(end) = self.end_time {
            block.end_time = Some(end);
        }
        if let Some(delayed) = self.is_delayed {
            block.is_delayed = delayed;
        }
        if let Some(title) = &self.task_title {
            block.title = title.clone();
        }
    }
}
