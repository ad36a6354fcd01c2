//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `taskrelay_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, AppConfig, ChannelConfig, DashScopeConfig, LoggingConfig,
};
pub use crate::error::{preview_body, CliError, TaskError};
pub use crate::task::{
    CanonicalTaskInfo, ChannelCredentials, PersistedTaskRecord, SubmitAck, TaskAdaptor,
    TaskProperties, TaskStatus, TaskSubmission, VideoStatus, VideoTask, VideoTaskError,
    METADATA_URL_KEY,
};
pub use crate::transport::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse};
