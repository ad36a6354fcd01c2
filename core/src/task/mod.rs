pub mod r#trait;
pub mod types;
pub mod video;

pub use r#trait::{SubmitAck, TaskAdaptor};
pub use types::{
    CanonicalTaskInfo, ChannelCredentials, PersistedTaskRecord, TaskProperties, TaskStatus,
    TaskSubmission,
};
pub use video::{VideoStatus, VideoTask, VideoTaskError, METADATA_URL_KEY, VIDEO_OBJECT};
