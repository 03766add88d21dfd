//! `bfetch config` – show where the config lives and what is in effect.

use anyhow::Result;
use bfetch_core::config::{self, FetchConfig};

pub fn run_config(cfg: &FetchConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    let cap = cfg
        .max_concurrent
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    println!("{:<22} {}", "max_concurrent", cap);
    println!("{:<22} {}", "chunk_size_bytes", cfg.chunk_size_bytes);
    println!("{:<22} {}", "connect_timeout_secs", cfg.connect_timeout_secs);
    println!("{:<22} {}", "low_speed_limit_bytes", cfg.low_speed_limit_bytes);
    println!("{:<22} {}", "low_speed_time_secs", cfg.low_speed_time_secs);
    println!("{:<22} {}", "max_redirections", cfg.max_redirections);
    println!("{:<22} {}", "user_agent", cfg.effective_user_agent());
    Ok(())
}
