use std::path::{Path, PathBuf};

use super::types::{AppConfig, ChannelConfig};

pub const ENV_BASE_URL: &str = "TASKRELAY_BASE_URL";
pub const ENV_API_KEY: &str = "TASKRELAY_API_KEY";

/// Get the default taskrelay data directory: ~/.taskrelay
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".taskrelay"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.taskrelay/config.toml (highest)
    let data_dir = get_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from(&user_config)?
    } else if local_config.exists() {
        load_from(local_config)?
    } else {
        AppConfig::default()
    };

    if cfg
        .logging
        .directory
        .as_deref()
        .map(|s| s.trim().is_empty())
        .unwrap_or(true)
    {
        cfg.logging.directory = Some(data_dir.join("logs").to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(cfg)
}

/// Environment variables win over file values; blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let ChannelConfig::DashScope(ref mut ds) = cfg.channel;

    if let Some(v) = lookup(ENV_BASE_URL) {
        if !v.trim().is_empty() {
            ds.base_url = v;
        }
    }
    if let Some(v) = lookup(ENV_API_KEY) {
        if !v.trim().is_empty() {
            ds.api_key = v;
        }
    }
}
