//! CLI command handlers. Each command is in its own file.

mod config;
mod fetch;

pub use config::run_config;
pub use fetch::{run_fetch, FetchOptions};
