use async_trait::async_trait;

use super::types::{
    CanonicalTaskInfo, ChannelCredentials, PersistedTaskRecord, TaskStatus, TaskSubmission,
};
use super::video::VideoTask;
use crate::error::TaskError;
use crate::transport::HttpResponse;

/// What a successful submission hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAck {
    pub task_id: String,
    pub status: TaskStatus,
    /// Raw vendor body, for the task store to persist.
    pub payload: Vec<u8>,
    /// "video task created" object for the caller.
    pub video: VideoTask,
}

/// One vendor's asynchronous task API behind the canonical contract.
///
/// Implementations hold no per-task state; every call is independent.
#[async_trait]
pub trait TaskAdaptor: Send + Sync {
    fn channel_name(&self) -> &str;

    fn model_list(&self) -> &[&'static str];

    async fn submit(
        &self,
        creds: &ChannelCredentials,
        submission: &TaskSubmission,
    ) -> Result<SubmitAck, TaskError>;

    async fn fetch_task(
        &self,
        creds: &ChannelCredentials,
        task_id: &str,
    ) -> Result<HttpResponse, TaskError>;

    fn parse_task_result(&self, body: &[u8]) -> Result<CanonicalTaskInfo, TaskError>;

    fn to_video_task(&self, record: &PersistedTaskRecord) -> Result<VideoTask, TaskError>;

    /// Fetch and translate in one step.
    async fn poll(
        &self,
        creds: &ChannelCredentials,
        task_id: &str,
    ) -> Result<CanonicalTaskInfo, TaskError> {
        let resp = self.fetch_task(creds, task_id).await?;
        self.parse_task_result(&resp.body)
    }
}
