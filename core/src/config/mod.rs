mod load;
mod types;

pub use load::{
    apply_env_overrides, get_data_dir, load_default, load_from, ENV_API_KEY, ENV_BASE_URL,
};
pub use types::{AppConfig, ChannelConfig, DashScopeConfig, LoggingConfig};
