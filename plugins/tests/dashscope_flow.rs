use std::sync::Arc;

use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;

use taskrelay_core::api::{
    ChannelCredentials, PersistedTaskRecord, TaskAdaptor, TaskError, TaskProperties, TaskStatus,
    TaskSubmission, VideoStatus,
};
use taskrelay_plugins::dashscope::{map_status, DashScopeAdaptor, VendorRequest};
use taskrelay_plugins::http::ReqwestExecutor;

const SUBMIT_PATH: &str = "/api/v1/services/aigc/video-generation/video-synthesis";

fn adaptor() -> DashScopeAdaptor {
    let exec = ReqwestExecutor::new(2_000).unwrap();
    DashScopeAdaptor::new(Arc::new(exec))
}

#[tokio::test]
async fn submit_then_poll_then_project() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", SUBMIT_PATH)
        .match_header("authorization", "Bearer sk-flow")
        .match_header("x-dashscope-async", "enable")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "wan2.2-i2v-plus",
            "input": {"img_url": "https://example.com/first.png"},
            "parameters": {"resolution": "1080P", "duration": 5}
        })))
        .with_status(200)
        .with_body(r#"{"output":{"task_status":"PENDING","task_id":"task-flow"},"request_id":"r-1"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/api/v1/tasks/task-flow")
        .match_header("authorization", "Bearer sk-flow")
        .match_header("x-dashscope-async", Matcher::Missing)
        .with_status(200)
        .with_body(
            r#"{"request_id":"r-2","output":{"task_id":"task-flow","task_status":"SUCCEEDED",
                "submit_time":"2025-09-29 14:18:52.331","end_time":"2025-09-29 14:23:38.513",
                "video_url":"https://dashscope-result.example.com/task-flow.mp4"},
                "usage":{"duration":5,"video_count":1,"SR":1080}}"#,
        )
        .create_async()
        .await;

    let creds = ChannelCredentials::new(server.url(), "sk-flow");
    let adaptor = adaptor();

    let mut sub = TaskSubmission::new("wan2.2-i2v-plus");
    sub.input_reference = Some("https://example.com/first.png".to_string());
    let ack = adaptor.submit(&creds, &sub).await.unwrap();
    assert_eq!(ack.task_id, "task-flow");
    assert_eq!(ack.status, TaskStatus::Queued);
    assert_eq!(ack.video.model, "wan2.2-i2v-plus");

    let resp = adaptor.fetch_task(&creds, &ack.task_id).await.unwrap();
    let info = adaptor.parse_task_result(&resp.body).unwrap();
    assert_eq!(info.status, TaskStatus::Success);
    assert_eq!(
        info.url.as_deref(),
        Some("https://dashscope-result.example.com/task-flow.mp4")
    );

    let record = PersistedTaskRecord {
        task_id: ack.task_id.clone(),
        data: resp.body,
        progress: "100%".to_string(),
        created_at: ack.video.created_at,
        updated_at: ack.video.created_at + 286,
        properties: TaskProperties {
            origin_model_name: "wan2.2-i2v-plus".to_string(),
        },
    };
    let video = adaptor.to_video_task(&record).unwrap();
    assert_eq!(video.status, VideoStatus::Completed);
    assert_eq!(
        video.url(),
        Some("https://dashscope-result.example.com/task-flow.mp4")
    );
    assert_eq!(video.error, None);

    submit.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn vendor_rejection_keeps_http_status() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", SUBMIT_PATH)
        .with_status(400)
        .with_body(
            r#"{"code":"InvalidParameter","message":"The size is not supported.","request_id":"r-3"}"#,
        )
        .create_async()
        .await;

    let creds = ChannelCredentials::new(server.url(), "sk");
    let mut sub = TaskSubmission::new("wan2.5-t2v-preview");
    sub.size = Some("999x999".to_string());

    let err = adaptor().submit(&creds, &sub).await.unwrap_err();
    match err {
        TaskError::VendorError {
            code,
            message,
            status,
        } => {
            assert_eq!(code, "InvalidParameter");
            assert_eq!(message, "The size is not supported.");
            assert_eq!(status, 400);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_task_poll_reports_reason() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/api/v1/tasks/task-bad")
        .with_status(200)
        .with_body(
            r#"{"output":{"task_id":"task-bad","task_status":"FAILED",
                "code":"DataInspectionFailed","message":"Input data may contain inappropriate content."}}"#,
        )
        .create_async()
        .await;

    let creds = ChannelCredentials::new(server.url(), "sk");
    let info = adaptor().poll(&creds, "task-bad").await.unwrap();
    assert_eq!(info.status, TaskStatus::Failure);
    let reason = info.reason.unwrap();
    assert!(reason.contains("DataInspectionFailed"));
    assert!(reason.contains("inappropriate content"));
}

#[tokio::test]
async fn rejected_poll_surfaces_vendor_error() {
    let mut server = Server::new_async().await;
    let m = server
        .mock("GET", "/api/v1/tasks/t1")
        .with_status(401)
        .with_body(
            r#"{"code":"InvalidApiKey","message":"Invalid API-key provided.","request_id":"r-4"}"#,
        )
        .create_async()
        .await;

    let creds = ChannelCredentials::new(server.url(), "sk-wrong");
    let err = adaptor().poll(&creds, "t1").await.unwrap_err();
    match err {
        TaskError::VendorError {
            code,
            message,
            status,
        } => {
            assert_eq!(code, "InvalidApiKey");
            assert_eq!(message, "Invalid API-key provided.");
            assert_eq!(status, 401);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    m.assert_async().await;
}

#[tokio::test]
async fn unreachable_vendor_is_transport_failure() {
    let creds = ChannelCredentials::new("http://127.0.0.1:1", "sk");
    let err = adaptor()
        .submit(&creds, &TaskSubmission::new("wan2.5-t2v-preview"))
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::TransportFailure(_)));
}

#[tokio::test]
async fn request_and_response_agree_on_status() {
    let adaptor = adaptor();
    let mut sub = TaskSubmission::new("wanx2.1-t2v-turbo");
    sub.prompt = Some("a lighthouse in a storm".to_string());
    sub.size = Some("480p".to_string());
    let body = adaptor.build_request_body(&sub).unwrap();
    let req: VendorRequest = serde_json::from_slice(&body).unwrap();
    assert_eq!(req.parameters.resolution, "480P");

    for vendor_status in ["PENDING", "RUNNING", "SUCCEEDED", "FAILED", "CANCELED", "UNKNOWN", "LATER"] {
        let reply = json!({
            "output": {"task_id": "t", "task_status": vendor_status, "video_url": "https://x/v.mp4"}
        });
        let info = adaptor
            .parse_task_result(reply.to_string().as_bytes())
            .unwrap();
        assert_eq!(info.status, map_status(vendor_status), "status {vendor_status}");
        assert_eq!(info.url.is_some(), info.status == TaskStatus::Success);
        assert_eq!(info.reason.is_some(), info.status == TaskStatus::Failure);
    }
}
