//! CLI for the bfetch batch fetcher.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use bfetch_core::config;
use std::path::PathBuf;

use commands::{run_config, run_fetch, FetchOptions};

/// Top-level CLI for the bfetch batch fetcher.
#[derive(Debug, Parser)]
#[command(name = "bfetch", version)]
#[command(about = "bfetch: resumable concurrent batch file fetcher", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every URL listed in a file (one per line), resuming partial files.
    Fetch {
        /// File with one absolute URL per line; blank lines are ignored.
        url_file: PathBuf,

        /// Extra request header sent with every request (repeatable).
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,

        /// Cookie sent with every request (repeatable).
        #[arg(long = "cookie", value_name = "NAME=VALUE")]
        cookies: Vec<String>,

        /// User-Agent for every request (overrides the config value).
        #[arg(long, value_name = "UA")]
        agent: Option<String>,

        /// Maximum number of downloads in flight at once (default: no limit, or config).
        #[arg(short = 'j', long, value_name = "N", value_parser = parse_positive)]
        max_concurrent: Option<usize>,

        /// Directory to save files into (default: current directory).
        #[arg(short = 'C', long, value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Transport read buffer size in bytes (overrides the config value).
        #[arg(long, value_name = "BYTES", value_parser = parse_positive)]
        chunk_size: Option<usize>,

        /// Do not print progress lines.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the config file path and effective settings.
    Config,
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl CliCommand {
    /// Parses arguments and runs the command. Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                url_file,
                headers,
                cookies,
                agent,
                max_concurrent,
                directory,
                chunk_size,
                quiet,
            } => {
                let opts = FetchOptions {
                    url_file,
                    headers,
                    cookies,
                    agent,
                    max_concurrent,
                    directory,
                    chunk_size,
                    quiet,
                };
                run_fetch(cfg, opts).await
            }
            CliCommand::Config => {
                run_config(&cfg)?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
