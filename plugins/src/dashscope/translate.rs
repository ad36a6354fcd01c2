//! DashScope response bodies -> canonical results.

use taskrelay_core::api::{
    CanonicalTaskInfo, SubmitAck, TaskError, TaskStatus, VideoStatus, VideoTask,
};

use super::models::{VendorFault, VendorResponse};
use super::status::map_status;

pub fn parse_response(body: &[u8]) -> Result<VendorResponse, TaskError> {
    serde_json::from_slice::<VendorResponse>(body).map_err(|e| TaskError::malformed(e, body))
}

/// Turns the reply to a submission into an acknowledgment.
///
/// A top-level vendor code is a rejection even when a task id is present;
/// a reply with neither error nor task id is itself an error.
pub fn translate_submit(
    http_status: u16,
    body: Vec<u8>,
    origin_model: &str,
) -> Result<SubmitAck, TaskError> {
    let resp = parse_response(&body)?;

    if let Some(VendorFault::Request { code, message }) = resp.fault() {
        tracing::warn!(
            target: "taskrelay.task",
            stage = "dashscope.submit.rejected",
            status = http_status,
            code = %code,
            request_id = %resp.request_id
        );
        return Err(TaskError::VendorError {
            code,
            message,
            status: http_status,
        });
    }

    if resp.output.task_id.is_empty() {
        return Err(TaskError::InvalidResponse("task_id is empty".to_string()));
    }

    let status = map_status(&resp.output.task_status);
    let mut video = VideoTask::new(resp.output.task_id.clone(), VideoStatus::from(status));
    video.model = origin_model.to_string();
    video.created_at = chrono::Utc::now().timestamp();

    tracing::info!(
        target: "taskrelay.task",
        stage = "dashscope.submit.accepted",
        task_id = %resp.output.task_id,
        status = %status,
        request_id = %resp.request_id
    );
    Ok(SubmitAck {
        task_id: resp.output.task_id,
        status,
        payload: body,
        video,
    })
}

/// Rejects a task-lookup reply that carries a top-level vendor code and no
/// task status, e.g. a bad key or an unknown task id. Replies that fail to
/// parse are left for [`translate_status`] to report.
pub fn check_lookup(http_status: u16, body: &[u8]) -> Result<(), TaskError> {
    let Ok(resp) = serde_json::from_slice::<VendorResponse>(body) else {
        return Ok(());
    };
    if !resp.output.task_status.is_empty() {
        return Ok(());
    }
    match resp.fault() {
        Some(VendorFault::Request { code, message }) => {
            tracing::warn!(
                target: "taskrelay.task",
                stage = "dashscope.fetch.rejected",
                status = http_status,
                code = %code,
                request_id = %resp.request_id
            );
            Err(TaskError::VendorError {
                code,
                message,
                status: http_status,
            })
        }
        _ => Ok(()),
    }
}

/// Canonical view of a task-lookup (or stored) payload.
pub fn translate_status(body: &[u8]) -> Result<CanonicalTaskInfo, TaskError> {
    let resp = parse_response(body)?;
    Ok(canonical_info(&resp))
}

pub(crate) fn canonical_info(resp: &VendorResponse) -> CanonicalTaskInfo {
    let status = map_status(&resp.output.task_status);
    let mut info = CanonicalTaskInfo::new(status);
    if !resp.output.task_id.is_empty() {
        info.task_id = Some(resp.output.task_id.clone());
    }
    match status {
        TaskStatus::Success => {
            // the vendor hosts the file; the URL is surfaced as-is
            info.url = Some(resp.output.video_url.clone());
        }
        TaskStatus::Failure => {
            info.reason = Some(resp.failure_reason());
        }
        TaskStatus::Queued | TaskStatus::InProgress => {}
    }
    info
}
