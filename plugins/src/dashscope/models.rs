//! Wire types for the DashScope video-synthesis async API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRequest {
    pub model: String,
    pub input: VendorInput,
    pub parameters: VendorParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// First frame, URL or base64 (image-to-video).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_frame_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Effect template name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorParameters {
    /// 480P / 720P / 1080P.
    pub resolution: String,
    /// Explicit dimensions such as "832*480" (text-to-video only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub duration: u32,
    pub prompt_extend: bool,
    pub watermark: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Shared by the submit and task-lookup endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorResponse {
    #[serde(default)]
    pub output: VendorOutput,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<VendorUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorOutput {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub task_status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub submit_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scheduled_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub end_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub orig_prompt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub actual_prompt: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub video_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorUsage {
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub video_count: u32,
    #[serde(default, rename = "SR")]
    pub sr: u32,
}

/// The vendor reports errors either at the top level (request rejected)
/// or inside `output` (task failed). Top level wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorFault {
    Request { code: String, message: String },
    Task { code: String, message: String },
}

impl VendorFault {
    pub fn code(&self) -> &str {
        match self {
            VendorFault::Request { code, .. } | VendorFault::Task { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            VendorFault::Request { message, .. } | VendorFault::Task { message, .. } => message,
        }
    }
}

pub const GENERIC_FAILURE_REASON: &str = "task failed";

impl VendorResponse {
    pub fn fault(&self) -> Option<VendorFault> {
        if !self.code.is_empty() {
            return Some(VendorFault::Request {
                code: self.code.clone(),
                message: self.message.clone(),
            });
        }
        if !self.output.code.is_empty() {
            return Some(VendorFault::Task {
                code: self.output.code.clone(),
                message: self.output.message.clone(),
            });
        }
        None
    }

    /// Human explanation for a failed task: top-level message, then the
    /// output code/message pair, then a generic fallback.
    pub fn failure_reason(&self) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        if !self.output.message.is_empty() {
            return format!(
                "task failed, code: {} , message: {}",
                self.output.code, self.output.message
            );
        }
        GENERIC_FAILURE_REASON.to_string()
    }
}
