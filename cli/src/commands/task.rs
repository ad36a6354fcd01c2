use serde::Serialize;
use serde_json::{Map, Value};

use taskrelay_core::api::{
    CanonicalTaskInfo, ChannelCredentials, CliError, PersistedTaskRecord, TaskAdaptor, TaskError,
    TaskProperties, TaskSubmission, VideoTask,
};

use super::cli::{PollArgs, SubmitArgs};

#[derive(Debug, Serialize)]
struct PollOutput {
    task: CanonicalTaskInfo,
    video: VideoTask,
}

pub async fn submit_cmd(
    adaptor: &dyn TaskAdaptor,
    creds: &ChannelCredentials,
    args: SubmitArgs,
    pretty: bool,
) -> Result<i32, CliError> {
    let metadata = match (args.metadata.as_deref(), args.metadata_file.as_deref()) {
        (Some(raw), _) => Some(parse_metadata(raw)?),
        (None, Some(path)) => Some(parse_metadata(&std::fs::read_to_string(path)?)?),
        (None, None) => None,
    };
    let submission = TaskSubmission {
        model: args.model,
        prompt: args.prompt,
        input_reference: args.input_reference,
        size: args.size,
        duration: args.duration,
        metadata,
    };

    let ack = adaptor.submit(creds, &submission).await?;
    print_json(&ack.video, pretty)?;
    Ok(0)
}

pub async fn poll_cmd(
    adaptor: &dyn TaskAdaptor,
    creds: &ChannelCredentials,
    args: PollArgs,
    pretty: bool,
) -> Result<i32, CliError> {
    let resp = adaptor.fetch_task(creds, &args.task_id).await?;
    let task = adaptor.parse_task_result(&resp.body)?;

    let record = PersistedTaskRecord {
        task_id: args.task_id.trim().to_string(),
        data: resp.body,
        progress: args.progress,
        created_at: args.created_at,
        updated_at: chrono::Utc::now().timestamp(),
        properties: TaskProperties {
            origin_model_name: args.model,
        },
    };
    let video = adaptor.to_video_task(&record)?;

    print_json(&PollOutput { task, video }, pretty)?;
    Ok(0)
}

pub fn models_cmd(adaptor: &dyn TaskAdaptor) -> Result<i32, CliError> {
    for model in adaptor.model_list() {
        println!("{}\t{}", adaptor.channel_name(), model);
    }
    Ok(0)
}

fn parse_metadata(raw: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(TaskError::InvalidRequest(format!(
            "metadata must be a JSON object, got {other}"
        ))
        .into()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn metadata_must_be_an_object() {
        let map = parse_metadata(r#"{"parameters":{"seed":7}}"#).unwrap();
        assert_eq!(map["parameters"]["seed"], 7);

        let err = parse_metadata("[1,2]").unwrap_err();
        assert!(matches!(err, CliError::Task(TaskError::InvalidRequest(_))));

        let err = parse_metadata("{oops").unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }
}
