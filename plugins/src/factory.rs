use std::sync::Arc;

use anyhow::Result;

use taskrelay_core::config::{AppConfig, ChannelConfig};
use taskrelay_core::task::{ChannelCredentials, TaskAdaptor};
use taskrelay_core::transport::HttpExecutor;

use crate::dashscope::DashScopeAdaptor;
use crate::http::ReqwestExecutor;

/// One shared client for the process; adaptors only borrow it.
pub fn build_executor(cfg: &AppConfig) -> Result<Arc<dyn HttpExecutor>> {
    let timeout_ms = match &cfg.channel {
        ChannelConfig::DashScope(ds) => ds.timeout_ms,
    };
    Ok(Arc::new(ReqwestExecutor::new(timeout_ms)?))
}

pub fn build_adaptor(cfg: &AppConfig, executor: Arc<dyn HttpExecutor>) -> Box<dyn TaskAdaptor> {
    match &cfg.channel {
        ChannelConfig::DashScope(_) => Box::new(DashScopeAdaptor::new(executor)),
    }
}

pub fn build_credentials(cfg: &AppConfig) -> ChannelCredentials {
    match &cfg.channel {
        ChannelConfig::DashScope(ds) => {
            ChannelCredentials::new(ds.base_url.clone(), ds.api_key.clone())
        }
    }
}
