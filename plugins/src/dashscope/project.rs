use taskrelay_core::api::{
    CanonicalTaskInfo, PersistedTaskRecord, TaskError, VideoStatus, VideoTask, VideoTaskError,
    METADATA_URL_KEY,
};

use super::translate::{canonical_info, parse_response};

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub info: CanonicalTaskInfo,
    pub video: VideoTask,
}

/// Rebuilds the outward video task from a stored record.
pub fn project(record: &PersistedTaskRecord) -> Result<Projection, TaskError> {
    let resp = parse_response(&record.data)?;
    let info = canonical_info(&resp);

    let mut video = VideoTask::new(record.task_id.clone(), VideoStatus::from(info.status));
    video.model = record.properties.origin_model_name.clone();
    video.set_progress_str(&record.progress);
    video.created_at = record.created_at;
    if info.status.is_terminal() && record.updated_at > 0 {
        video.completed_at = Some(record.updated_at);
    }
    video.set_metadata(METADATA_URL_KEY, resp.output.video_url.clone());
    video.error = resp.fault().map(|fault| VideoTaskError {
        code: fault.code().to_string(),
        message: fault.message().to_string(),
    });

    tracing::debug!(
        target: "taskrelay.task",
        stage = "dashscope.project.out",
        task_id = %record.task_id,
        status = %info.status,
        has_error = video.error.is_some()
    );
    Ok(Projection { info, video })
}
