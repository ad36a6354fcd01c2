use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TaskError;

/// Provider-agnostic submission as received from the intake layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSubmission {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// URL or encoded image used as the first frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_reference: Option<String>,
    /// Resolution token ("720p") or dimension string ("832x480").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Seconds. Absent or not positive means "use the channel default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Vendor-specific overrides, applied last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl TaskSubmission {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.model.trim().is_empty() {
            return Err(TaskError::InvalidRequest("model is required".to_string()));
        }
        Ok(())
    }
}

/// Canonical four-state task lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Queued,
    InProgress,
    Success,
    Failure,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failure)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Queued => "QUEUED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failure => "FAILURE",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of translating one vendor payload.
///
/// `url` is only set for `Success`, `reason` only for `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTaskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub code: i32,
}

impl CanonicalTaskInfo {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            task_id: None,
            status,
            url: None,
            reason: None,
            code: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskProperties {
    pub origin_model_name: String,
}

/// A task row as kept by the external task store. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedTaskRecord {
    pub task_id: String,
    /// Raw vendor payload from the last submit or poll.
    pub data: Vec<u8>,
    /// Percentage string such as "30%".
    pub progress: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub properties: TaskProperties,
}

/// Who to talk to, and with which key. Supplied per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCredentials {
    pub base_url: String,
    pub api_key: String,
}

impl ChannelCredentials {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
