use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "taskrelay_plugins=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ChannelConfig {
    #[serde(rename = "dashscope")]
    DashScope(DashScopeConfig),
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig::DashScope(DashScopeConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashScopeConfig {
    #[serde(default = "default_dashscope_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout handed to the shared HTTP client.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_dashscope_url() -> String {
    "https://dashscope.aliyuncs.com".to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for DashScopeConfig {
    fn default() -> Self {
        Self {
            base_url: default_dashscope_url(),
            api_key: "".to_string(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
