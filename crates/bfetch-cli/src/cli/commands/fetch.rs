//! `bfetch fetch` – download every URL in a file.

use anyhow::{Context, Result};
use bfetch_core::config::FetchConfig;
use bfetch_core::control::AbortToken;
use bfetch_core::input;
use bfetch_core::scheduler::{Batch, DownloadTask, TransferGate};
use bfetch_core::transport::{CurlTransport, SessionSettings};
use std::path::PathBuf;
use std::time::Instant;

use crate::cli::render::TerminalSink;

/// Exit status used when the process is killed by a second Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub url_file: PathBuf,
    pub headers: Vec<String>,
    pub cookies: Vec<String>,
    pub agent: Option<String>,
    pub max_concurrent: Option<usize>,
    pub directory: Option<PathBuf>,
    pub chunk_size: Option<usize>,
    pub quiet: bool,
}

impl FetchOptions {
    /// Applies command-line overrides on top of the loaded config.
    fn apply_to(&self, cfg: &mut FetchConfig) {
        if let Some(agent) = &self.agent {
            cfg.user_agent = Some(agent.clone());
        }
        if let Some(n) = self.max_concurrent {
            cfg.max_concurrent = Some(n);
        }
        if let Some(n) = self.chunk_size {
            cfg.chunk_size_bytes = n;
        }
    }
}

/// Runs one batch. Returns the number of failed downloads (clamped to 255) as the exit code.
pub async fn run_fetch(mut cfg: FetchConfig, opts: FetchOptions) -> Result<i32> {
    let locators = input::load_locators(&opts.url_file)?;
    let headers = input::harvest_headers(&opts.headers)?;
    let cookies = input::harvest_cookies(&opts.cookies)?;
    opts.apply_to(&mut cfg);

    let directory = match &opts.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    if !directory.is_dir() {
        anyhow::bail!("download directory {} does not exist", directory.display());
    }

    if locators.is_empty() {
        eprintln!("no URLs in {}", opts.url_file.display());
        return Ok(0);
    }

    let settings =
        SessionSettings::from_config(&cfg, headers, input::cookie_header_value(&cookies));
    let transport = CurlTransport::new(settings);
    let abort = AbortToken::new();
    spawn_interrupt_handler(abort.clone());

    let quiet = opts.quiet;
    let started = Instant::now();
    let report = Batch::new(
        transport,
        TransferGate::new(cfg.max_concurrent),
        move |task: &DownloadTask| TerminalSink::new(task, quiet),
    )
    .directory(&directory)
    .abort_token(abort)
    .run(&locators)
    .await;

    for (task, err) in report.failures() {
        eprintln!("{}: {}", task.locator, err);
    }
    let failed = report.exit_code();
    eprintln!(
        "{} of {} downloads succeeded in {:.1}s",
        report.len() - failed,
        report.len(),
        started.elapsed().as_secs_f64()
    );

    Ok(failed.min(255) as i32)
}

/// First Ctrl-C lets in-flight transfers finish their current chunk and stops
/// the batch; a second one exits immediately.
fn spawn_interrupt_handler(abort: AbortToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("could not install Ctrl-C handler");
            return;
        }
        tracing::warn!("interrupt received; stopping after current chunks");
        eprintln!("\ninterrupted: stopping after current chunks (Ctrl-C again to quit now)");
        abort.request_abort();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("second interrupt; exiting");
            std::process::exit(EXIT_INTERRUPTED);
        }
    });
}
