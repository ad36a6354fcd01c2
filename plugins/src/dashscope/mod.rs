//! Alibaba DashScope (Wanxiang) asynchronous video generation.

pub mod adaptor;
pub mod models;
pub mod normalize;
pub mod project;
pub mod status;
pub mod translate;

pub use adaptor::{DashScopeAdaptor, CHANNEL_NAME, MODEL_LIST};
pub use models::{VendorFault, VendorRequest, VendorResponse};
pub use normalize::{normalize, RequestOverrides};
pub use project::{project, Projection};
pub use status::map_status;
pub use translate::{check_lookup, translate_status, translate_submit};
