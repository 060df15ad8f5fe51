//! REST backend for the hosted planner API.
//!
//! Endpoints: `GET /schedule`, `PATCH|DELETE /tasks/block/{id}`,
//! `PATCH /tasks/block/{id}/done|undone` and `POST /tasks/block/{id}/defer`.
//! The server sometimes reports a missing block as a `200` whose body is
//! `[{"error": ...}, 404]`, so bodies are checked for that shape too.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::models::schedule_block::{BlockId, BlockPatch, ScheduleBlock};
use crate::utils::date::parse_day_key;

use super::{BackendError, BackendResult, ScheduleBackend};

pub struct HttpScheduleBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeferResponse {
    day_date: String,
}

impl HttpScheduleBackend {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build schedule HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and turn non-success statuses (real or embedded) into errors.
    fn send(&self, builder: RequestBuilder, action: &'static str, id: Option<BlockId>) -> BackendResult<Value> {
        let response = self.authorized(builder).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(BackendError::NotFound(id));
            }
        }
        if !status.is_success() {
            return Err(BackendError::Status {
                action,
                status: status.as_u16(),
            });
        }
        let body = read_body(response)?;
        check_embedded_status(&body, action, id)?;
        Ok(body)
    }
}

fn read_body(response: Response) -> BackendResult<Value> {
    let text = response.text()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|err| BackendError::Decode(err.to_string()))
}

/// Detect `[{"error": "..."}, status]` bodies.
fn check_embedded_status(body: &Value, action: &'static str, id: Option<BlockId>) -> BackendResult<()> {
    let Some(items) = body.as_array() else {
        return Ok(());
    };
    let [payload, status] = items.as_slice() else {
        return Ok(());
    };
    let (Some(status), true) = (status.as_u64(), payload.get("error").is_some()) else {
        return Ok(());
    };
    match (status, id) {
        (404, Some(id)) => Err(BackendError::NotFound(id)),
        (status, _) if status >= 400 => Err(BackendError::Status {
            action,
            status: status as u16,
        }),
        _ => Ok(()),
    }
}

fn decode_schedule(body: Value) -> BackendResult<Vec<ScheduleBlock>> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => return Err(BackendError::Decode(format!("expected a list of blocks, got {}", other))),
    };
    // One bad row should not hide the rest of the schedule
    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<ScheduleBlock>(row) {
            Ok(block) => Some(block),
            Err(err) => {
                log::warn!("Skipping undecodable schedule row: {}", err);
                None
            }
        })
        .collect())
}

impl ScheduleBackend for HttpScheduleBackend {
    fn fetch_schedule(&self) -> BackendResult<Vec<ScheduleBlock>> {
        let body = self.send(self.client.get(self.url("/schedule")), "fetch schedule", None)?;
        decode_schedule(body)
    }

    fn update_block(&self, id: BlockId, patch: &BlockPatch) -> BackendResult<()> {
        let request = self
            .client
            .patch(self.url(&format!("/tasks/block/{}", id)))
            .json(patch);
        self.send(request, "update block", Some(id)).map(|_| ())
    }

    fn delete_block(&self, id: BlockId) -> BackendResult<()> {
        let request = self.client.delete(self.url(&format!("/tasks/block/{}", id)));
        self.send(request, "delete block", Some(id)).map(|_| ())
    }

    fn set_completed(&self, id: BlockId, completed: bool) -> BackendResult<()> {
        let suffix = if completed { "done" } else { "undone" };
        let request = self
            .client
            .patch(self.url(&format!("/tasks/block/{}/{}", id, suffix)));
        self.send(request, "toggle completion", Some(id)).map(|_| ())
    }

    fn defer_block(&self, id: BlockId) -> BackendResult<NaiveDate> {
        let request = self
            .client
            .post(self.url(&format!("/tasks/block/{}/defer", id)));
        let body = self.send(request, "defer block", Some(id))?;
        let response: DeferResponse =
            serde_json::from_value(body).map_err(|err| BackendError::Decode(err.to_string()))?;
        parse_day_key(&response.day_date).map_err(|err| BackendError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_is_normalised() {
        let backend = HttpScheduleBackend::new("https://planner.example.com/api/", None).unwrap();
        assert_eq!(backend.base_url(), "https://planner.example.com/api");
        assert_eq!(backend.url("/schedule"), "https://planner.example.com/api/schedule");
    }

    #[test]
    fn test_embedded_not_found_is_an_error() {
        let body = json!([{"error": "Block not found"}, 404]);
        assert!(matches!(
            check_embedded_status(&body, "delete block", Some(9)),
            Err(BackendError::NotFound(9))
        ));
        let body = json!([{"error": "Block has no day_date"}, 400]);
        assert!(matches!(
            check_embedded_status(&body, "defer block", Some(9)),
            Err(BackendError::Status { status: 400, .. })
        ));
    }

    #[test]
    fn test_regular_bodies_pass() {
        assert!(check_embedded_status(&json!({"message": "Block updated successfully"}), "update", Some(1)).is_ok());
        assert!(check_embedded_status(&json!([1, 2]), "update", Some(1)).is_ok());
        assert!(check_embedded_status(&Value::Null, "update", Some(1)).is_ok());
    }

    #[test]
    fn test_decode_schedule_skips_bad_rows() {
        let body = json!([
            {"id": 1, "block_type": "study", "start_time": "2025-03-10 09:00:00", "end_time": "2025-03-10 10:00:00", "day_date": "2025-03-10"},
            {"block_type": "study"},
            {"id": 3, "block_type": "break", "start_time": "2025-03-10T10:00:00", "end_time": "2025-03-10T10:15:00"}
        ]);
        let blocks = decode_schedule(body).unwrap();
        let ids: Vec<BlockId> = blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_decode_schedule_rejects_objects() {
        assert!(matches!(decode_schedule(json!({"error": "nope"})), Err(BackendError::Decode(_))));
    }
}
