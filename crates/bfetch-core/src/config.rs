use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default transport read buffer (chunk) size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 60 * 1024;

/// Global configuration loaded from `~/.config/bfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of transfers in flight at once (None = no cap).
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    /// Size of the transport read buffer; body chunks are at most this long.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
    /// Seconds to wait for a connection before failing the transfer.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Abort a transfer whose throughput stays below this many bytes per second...
    #[serde(default = "default_low_speed_limit")]
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    #[serde(default = "default_low_speed_time")]
    pub low_speed_time_secs: u64,
    /// Maximum number of redirects followed per request.
    #[serde(default = "default_max_redirections")]
    pub max_redirections: u32,
    /// User-Agent sent with every request (None = `bfetch/<version>`).
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_low_speed_limit() -> u32 {
    1024
}

fn default_low_speed_time() -> u64 {
    60
}

fn default_max_redirections() -> u32 {
    10
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: None,
            chunk_size_bytes: default_chunk_size(),
            connect_timeout_secs: default_connect_timeout(),
            low_speed_limit_bytes: default_low_speed_limit(),
            low_speed_time_secs: default_low_speed_time(),
            max_redirections: default_max_redirections(),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }

    /// User-Agent to send: configured value or `bfetch/<crate version>`.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("bfetch/{}", env!("CARGO_PKG_VERSION")))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
