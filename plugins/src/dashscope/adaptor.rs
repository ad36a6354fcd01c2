use std::sync::Arc;

use async_trait::async_trait;
use taskrelay_core::api as core_api;
use taskrelay_core::api::TaskError;

use super::normalize::{normalize, RequestOverrides};
use super::project::project;
use super::translate::{check_lookup, translate_status, translate_submit};

pub const CHANNEL_NAME: &str = "ali";

pub const MODEL_LIST: &[&str] = &[
    "wan2.5-t2v-preview",
    "wan2.5-i2v-preview",
    "wan2.2-t2v-plus",
    "wan2.2-i2v-flash",
    "wan2.2-i2v-plus",
    "wanx2.1-t2v-turbo",
    "wanx2.1-t2v-plus",
    "wanx2.1-i2v-turbo",
    "wanx2.1-i2v-plus",
    "wanx2.1-kf2v-plus",
];

const SUBMIT_PATH: &str = "/api/v1/services/aigc/video-generation/video-synthesis";
const TASK_PATH: &str = "/api/v1/tasks";
const ASYNC_HEADER: &str = "X-DashScope-Async";

/// DashScope video-synthesis behind [`core_api::TaskAdaptor`].
///
/// Holds only the shared executor, so one instance serves every channel
/// and every concurrent call.
#[derive(Clone)]
pub struct DashScopeAdaptor {
    executor: Arc<dyn core_api::HttpExecutor>,
}

impl DashScopeAdaptor {
    pub fn new(executor: Arc<dyn core_api::HttpExecutor>) -> Self {
        Self { executor }
    }

    pub fn build_request_url(&self, creds: &core_api::ChannelCredentials) -> String {
        format!("{}{}", creds.base(), SUBMIT_PATH)
    }

    pub fn build_request_body(
        &self,
        submission: &core_api::TaskSubmission,
    ) -> Result<Vec<u8>, TaskError> {
        submission.validate()?;
        let overrides = submission
            .metadata
            .as_ref()
            .map(RequestOverrides::from_metadata)
            .transpose()?;
        let req = normalize(submission, overrides.as_ref());
        serde_json::to_vec(&req)
            .map_err(|e| TaskError::InvalidRequest(format!("marshal request failed: {e}")))
    }

    pub fn build_submit_request(
        &self,
        creds: &core_api::ChannelCredentials,
        body: Vec<u8>,
    ) -> core_api::HttpRequest {
        core_api::HttpRequest::new(core_api::HttpMethod::Post, self.build_request_url(creds))
            .header("Authorization", format!("Bearer {}", creds.api_key))
            .header("Content-Type", "application/json")
            .header(ASYNC_HEADER, "enable")
            .body(body)
    }

    pub fn build_fetch_request(
        &self,
        creds: &core_api::ChannelCredentials,
        task_id: &str,
    ) -> Result<core_api::HttpRequest, TaskError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(TaskError::InvalidRequest("invalid task_id".to_string()));
        }
        if task_id.contains(['/', '?', '#']) {
            return Err(TaskError::InvalidRequest(format!(
                "invalid task_id: {task_id}"
            )));
        }
        let url = format!("{}{}/{}", creds.base(), TASK_PATH, task_id);
        Ok(core_api::HttpRequest::new(core_api::HttpMethod::Get, url)
            .header("Authorization", format!("Bearer {}", creds.api_key)))
    }
}

#[async_trait]
impl core_api::TaskAdaptor for DashScopeAdaptor {
    fn channel_name(&self) -> &str {
        CHANNEL_NAME
    }

    fn model_list(&self) -> &[&'static str] {
        MODEL_LIST
    }

    async fn submit(
        &self,
        creds: &core_api::ChannelCredentials,
        submission: &core_api::TaskSubmission,
    ) -> Result<core_api::SubmitAck, TaskError> {
        tracing::debug!(
            target: "taskrelay.task",
            stage = "dashscope.submit.in",
            model = %submission.model,
            has_metadata = submission.metadata.is_some()
        );
        let body = self.build_request_body(submission)?;
        let req = self.build_submit_request(creds, body);
        let resp = self
            .executor
            .execute(req)
            .await
            .map_err(TaskError::TransportFailure)?;
        translate_submit(resp.status, resp.body, &submission.model)
    }

    async fn fetch_task(
        &self,
        creds: &core_api::ChannelCredentials,
        task_id: &str,
    ) -> Result<core_api::HttpResponse, TaskError> {
        let req = self.build_fetch_request(creds, task_id)?;
        tracing::debug!(
            target: "taskrelay.task",
            stage = "dashscope.fetch.in",
            task_id = %task_id
        );
        let resp = self
            .executor
            .execute(req)
            .await
            .map_err(TaskError::TransportFailure)?;
        tracing::debug!(
            target: "taskrelay.task",
            stage = "dashscope.fetch.out",
            task_id = %task_id,
            status = resp.status,
            success = resp.is_success()
        );
        check_lookup(resp.status, &resp.body)?;
        Ok(resp)
    }

    fn parse_task_result(&self, body: &[u8]) -> Result<core_api::CanonicalTaskInfo, TaskError> {
        translate_status(body)
    }

    fn to_video_task(
        &self,
        record: &core_api::PersistedTaskRecord,
    ) -> Result<core_api::VideoTask, TaskError> {
        Ok(project(record)?.video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use core_api::TaskAdaptor;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Records the last request and replays a canned response.
    struct CannedExecutor {
        status: u16,
        body: &'static str,
        seen: Mutex<Option<core_api::HttpRequest>>,
    }

    impl CannedExecutor {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(None),
            })
        }

        fn last(&self) -> core_api::HttpRequest {
            self.seen.lock().unwrap().clone().expect("no request seen")
        }
    }

    #[async_trait]
    impl core_api::HttpExecutor for CannedExecutor {
        async fn execute(&self, request: core_api::HttpRequest) -> Result<core_api::HttpResponse> {
            *self.seen.lock().unwrap() = Some(request);
            Ok(core_api::HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct FailingExecutor;

    #[async_trait]
    impl core_api::HttpExecutor for FailingExecutor {
        async fn execute(&self, _request: core_api::HttpRequest) -> Result<core_api::HttpResponse> {
            Err(anyhow::anyhow!("connection reset by peer"))
        }
    }

    fn creds() -> core_api::ChannelCredentials {
        core_api::ChannelCredentials::new("https://dashscope.example.com/", "sk-test")
    }

    #[test]
    fn submit_request_carries_async_headers() {
        let adaptor = DashScopeAdaptor::new(CannedExecutor::new(200, "{}"));
        let req = adaptor.build_submit_request(&creds(), b"{}".to_vec());

        assert_eq!(req.method, core_api::HttpMethod::Post);
        assert_eq!(
            req.url,
            "https://dashscope.example.com/api/v1/services/aigc/video-generation/video-synthesis"
        );
        assert_eq!(req.headers.get("Authorization").map(String::as_str), Some("Bearer sk-test"));
        assert_eq!(req.headers.get("Content-Type").map(String::as_str), Some("application/json"));
        assert_eq!(req.headers.get("X-DashScope-Async").map(String::as_str), Some("enable"));
    }

    #[test]
    fn fetch_request_is_bearer_only_get() {
        let adaptor = DashScopeAdaptor::new(CannedExecutor::new(200, "{}"));
        let req = adaptor.build_fetch_request(&creds(), "abc-123").unwrap();

        assert_eq!(req.method, core_api::HttpMethod::Get);
        assert_eq!(req.url, "https://dashscope.example.com/api/v1/tasks/abc-123");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.body, None);
    }

    #[test]
    fn fetch_request_rejects_bad_task_ids() {
        let adaptor = DashScopeAdaptor::new(CannedExecutor::new(200, "{}"));
        for id in ["", "   ", "a/b", "x?y=1"] {
            let err = adaptor.build_fetch_request(&creds(), id).unwrap_err();
            assert!(matches!(err, TaskError::InvalidRequest(_)), "id {id:?}");
        }
    }

    #[test]
    fn empty_model_is_rejected_before_any_io() {
        let adaptor = DashScopeAdaptor::new(CannedExecutor::new(200, "{}"));
        let err = adaptor
            .build_request_body(&core_api::TaskSubmission::new(""))
            .unwrap_err();
        assert!(matches!(err, TaskError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn submit_sends_normalized_body() {
        let exec = CannedExecutor::new(
            200,
            r#"{"output":{"task_status":"PENDING","task_id":"t-1"},"request_id":"r-1"}"#,
        );
        let adaptor = DashScopeAdaptor::new(exec.clone());
        let mut sub = core_api::TaskSubmission::new("wan2.5-t2v-preview");
        sub.prompt = Some("sunrise over hills".to_string());
        sub.duration = Some(10);

        let ack = adaptor.submit(&creds(), &sub).await.unwrap();
        assert_eq!(ack.task_id, "t-1");
        assert_eq!(ack.status, core_api::TaskStatus::Queued);

        let sent: serde_json::Value =
            serde_json::from_slice(exec.last().body.as_deref().unwrap()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "model": "wan2.5-t2v-preview",
                "input": {"prompt": "sunrise over hills"},
                "parameters": {
                    "resolution": "1080P",
                    "duration": 10,
                    "prompt_extend": true,
                    "watermark": false
                }
            })
        );
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let adaptor = DashScopeAdaptor::new(Arc::new(FailingExecutor));
        let err = adaptor
            .submit(&creds(), &core_api::TaskSubmission::new("wan2.5-t2v-preview"))
            .await
            .unwrap_err();
        match err {
            TaskError::TransportFailure(source) => {
                assert_eq!(source.to_string(), "connection reset by peer")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn poll_reuses_status_translation() {
        let exec = CannedExecutor::new(
            200,
            r#"{"output":{"task_id":"t-1","task_status":"RUNNING"},"request_id":"r-2"}"#,
        );
        let adaptor = DashScopeAdaptor::new(exec.clone());
        let info = adaptor.poll(&creds(), "t-1").await.unwrap();
        assert_eq!(info.status, core_api::TaskStatus::InProgress);
        assert_eq!(info.task_id.as_deref(), Some("t-1"));
        assert_eq!(exec.last().method, core_api::HttpMethod::Get);
    }

    #[tokio::test]
    async fn poll_rejected_lookup_is_vendor_error() {
        let exec = CannedExecutor::new(
            401,
            r#"{"code":"InvalidApiKey","message":"Invalid API-key provided.","request_id":"r-3"}"#,
        );
        let adaptor = DashScopeAdaptor::new(exec);
        let err = adaptor.poll(&creds(), "t-1").await.unwrap_err();
        assert!(matches!(err, TaskError::VendorError { status: 401, .. }));
        assert_eq!(err.error_code(), "vendor_api_error");
    }

    #[test]
    fn exposes_catalogue() {
        let adaptor = DashScopeAdaptor::new(Arc::new(FailingExecutor));
        assert_eq!(adaptor.channel_name(), "ali");
        assert!(adaptor.model_list().contains(&"wan2.2-i2v-flash"));
    }
}
