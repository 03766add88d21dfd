use bfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

/// Exit status for setup errors (bad arguments, unreadable URL file, ...).
const EXIT_SETUP_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    match CliCommand::run_from_args().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("bfetch error: {:#}", err);
            std::process::exit(EXIT_SETUP_ERROR);
        }
    }
}
