//! Outward "video task" object handed to the unified API layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::TaskStatus;

pub const VIDEO_OBJECT: &str = "video";
pub const METADATA_URL_KEY: &str = "url";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl From<TaskStatus> for VideoStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Queued => VideoStatus::Queued,
            TaskStatus::InProgress => VideoStatus::InProgress,
            TaskStatus::Success => VideoStatus::Completed,
            TaskStatus::Failure => VideoStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTaskError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTask {
    pub id: String,
    pub object: String,
    pub model: String,
    pub status: VideoStatus,
    pub progress: u8,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VideoTaskError>,
}

impl VideoTask {
    pub fn new(id: impl Into<String>, status: VideoStatus) -> Self {
        Self {
            id: id.into(),
            object: VIDEO_OBJECT.to_string(),
            model: String::new(),
            status,
            progress: 0,
            created_at: 0,
            completed_at: None,
            metadata: BTreeMap::new(),
            error: None,
        }
    }

    /// Accepts "45%", "45" or " 45 % "; anything unparseable leaves progress untouched.
    pub fn set_progress_str(&mut self, progress: &str) {
        let digits = progress.trim().trim_end_matches('%').trim();
        if let Ok(value) = digits.parse::<u16>() {
            self.progress = value.min(100) as u8;
        }
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.metadata.get(METADATA_URL_KEY).and_then(Value::as_str)
    }
}
