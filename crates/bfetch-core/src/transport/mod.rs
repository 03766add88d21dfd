//! Request/response transport seam.
//!
//! A transfer is two steps: [`Transport::start`] issues the GET and resolves
//! once the final response's status and headers are known, before any body
//! byte is consumed; the returned [`ChunkStream`] then yields the body lazily.
//! Dropping the stream early abandons the rest of the body.

mod libcurl;
#[cfg(test)]
pub(crate) mod mock;
mod parse;

pub use libcurl::{CurlBody, CurlTransport, SessionSettings};

use std::future::Future;
use thiserror::Error;

/// Status and headers of the response that carries the body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMetadata {
    pub status: u32,
    /// Media type without parameters (e.g. `application/octet-stream`).
    pub content_type: Option<String>,
    /// Bytes this response will send (the remaining suffix for a 206), not the resource size.
    pub content_length: Option<u64>,
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// libcurl reported an error (connect, timeout, TLS, truncated body, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),

    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking transfer worker stopped without reporting a result.
    #[error("transfer worker stopped: {0}")]
    Worker(String),
}

/// Issues GET requests. Shared read-only by every task of a batch.
pub trait Transport: Send + Sync + 'static {
    type Body: ChunkStream + 'static;

    /// Send a GET for `url` with per-request `headers` (on top of session-wide ones)
    /// and wait for the final response's metadata.
    fn start(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<(ResponseMetadata, Self::Body), TransportError>> + Send;
}

/// Pull-based response body.
pub trait ChunkStream: Send {
    /// Next chunk, `Ok(None)` at the end of the body.
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;
}
