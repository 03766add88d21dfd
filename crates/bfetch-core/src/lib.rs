//! Resumable concurrent batch download engine.
//!
//! Pipeline per locator: [`url_model`] resolves the destination, [`resume`]
//! probes it, [`transfer`] drives the request and streaming write, and
//! [`progress`] observes it. [`scheduler`] runs many of these at once.

pub mod config;
pub mod control;
pub mod input;
pub mod logging;
pub mod progress;
pub mod resume;
pub mod scheduler;
pub mod status;
pub mod storage;
pub mod transfer;
pub mod transport;
pub mod url_model;
