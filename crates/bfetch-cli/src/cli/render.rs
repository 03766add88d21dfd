//! Terminal progress lines, one sink per download, throttled per file.

use bfetch_core::progress::{ProgressEvent, ProgressSink};
use bfetch_core::scheduler::DownloadTask;
use bfetch_core::transfer::{Completion, TransferOutcome};
use std::time::{Duration, Instant};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

pub struct TerminalSink {
    name: String,
    quiet: bool,
    /// Bytes on disk before this run; the first event reports them and is not counted as throughput.
    base: u64,
    started: Instant,
    last_print: Option<Instant>,
    fetched: u64,
    last: Option<ProgressEvent>,
}

impl TerminalSink {
    pub fn new(task: &DownloadTask, quiet: bool) -> Self {
        Self {
            name: task.file_name(),
            quiet,
            base: task.intent.offset().unwrap_or(0),
            started: Instant::now(),
            last_print: None,
            fetched: 0,
            last: None,
        }
    }

    fn rate(&self) -> f64 {
        let secs = self.started.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.fetched as f64 / secs
        } else {
            0.0
        }
    }
}

impl ProgressSink for TerminalSink {
    fn observe(&mut self, event: ProgressEvent) {
        let baseline = self.last.is_none()
            && self.base > 0
            && event.received == event.cumulative
            && event.cumulative == self.base;
        if !baseline {
            self.fetched += event.received;
        }
        self.last = Some(event);

        if self.quiet {
            return;
        }
        let now = Instant::now();
        let due = self
            .last_print
            .map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
        if due {
            eprintln!("{}", progress_line(&self.name, &event, self.rate()));
            self.last_print = Some(now);
        }
    }

    fn finish(&mut self, outcome: &TransferOutcome) {
        if self.quiet {
            return;
        }
        let line = match outcome {
            TransferOutcome::Success(summary) => match summary.completion {
                Completion::AlreadyComplete => format!(
                    "  {}  already complete ({})",
                    self.name,
                    format_bytes(summary.size_on_disk)
                ),
                _ => format!(
                    "  {}  done  {} in {:.1}s",
                    self.name,
                    format_bytes(summary.size_on_disk),
                    self.started.elapsed().as_secs_f64()
                ),
            },
            TransferOutcome::Failure(e) => format!("  {}  failed: {}", self.name, e),
        };
        eprintln!("{}", line);
    }
}

/// `  name  45.2%  12.3 MiB / 27.2 MiB  3.21 MiB/s`, or without percentage when the total is unknown.
pub fn progress_line(name: &str, event: &ProgressEvent, rate: f64) -> String {
    let rate = format!("{}/s", format_bytes(rate as u64));
    match (event.fraction(), event.total) {
        (Some(fraction), Some(total)) => format!(
            "  {}  {:.1}%  {} / {}  {}",
            name,
            fraction * 100.0,
            format_bytes(event.cumulative),
            format_bytes(total),
            rate
        ),
        _ => format!("  {}  {}  {}", name, format_bytes(event.cumulative), rate),
    }
}

pub fn format_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if n < 1024 {
        return format!("{} B", n);
    }
    let mut value = n as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
