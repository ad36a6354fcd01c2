use thiserror::Error;

use super::task::TaskError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("task failed: {0}")]
    Task(#[from] TaskError),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
