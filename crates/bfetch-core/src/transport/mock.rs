//! In-memory transport for unit tests.
//!
//! Serves registered bodies by URL, honours (or ignores) `Range: bytes=N-`,
//! can inject status codes and mid-body failures, and records what it saw:
//! range headers per URL and peak concurrent open bodies.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{ChunkStream, ResponseMetadata, Transport, TransportError};

#[derive(Debug, Clone)]
pub(crate) struct MockResource {
    pub body: Vec<u8>,
    pub honours_ranges: bool,
    /// Respond with this status instead of the range-derived one.
    pub status_override: Option<u32>,
    /// Whether an overridden status still carries `body` (otherwise it is empty).
    pub body_on_override: bool,
    /// Fail with a transport error after this many body bytes.
    pub fail_after: Option<usize>,
    pub chunk_size: usize,
    pub omit_length: bool,
    /// Sleep before each chunk (to keep tasks overlapping).
    pub delay: Option<Duration>,
}

impl MockResource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            honours_ranges: true,
            status_override: None,
            body_on_override: false,
            fail_after: None,
            chunk_size: 4,
            omit_length: false,
            delay: None,
        }
    }

    pub fn ignoring_ranges(mut self) -> Self {
        self.honours_ranges = false;
        self
    }

    pub fn with_status(mut self, status: u32) -> Self {
        self.status_override = Some(status);
        self
    }

    /// Serve the whole body under `status`, whatever the request asked for.
    pub fn whole_body_as(mut self, status: u32) -> Self {
        self.status_override = Some(status);
        self.body_on_override = true;
        self
    }

    pub fn failing_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub fn chunked(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn without_length(mut self) -> Self {
        self.omit_length = true;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    active: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct MockTransport {
    resources: Arc<Mutex<HashMap<String, MockResource>>>,
    ranges: Arc<Mutex<Vec<(String, Option<String>)>>>,
    counters: Arc<Counters>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, resource: MockResource) -> &Self {
        self.resources
            .lock()
            .unwrap()
            .insert(url.to_string(), resource);
        self
    }

    /// `Range` header (if any) of every request to `url`, in order.
    pub fn ranges_for(&self, url: &str) -> Vec<Option<String>> {
        self.ranges
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn requests(&self) -> usize {
        self.ranges.lock().unwrap().len()
    }

    /// Highest number of bodies that were open at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

/// Decrements the active-body count when the body is dropped.
#[derive(Debug)]
struct ActiveGuard(Arc<Counters>);

impl ActiveGuard {
    fn enter(counters: &Arc<Counters>) -> Self {
        let now = counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(now, Ordering::SeqCst);
        Self(Arc::clone(counters))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub(crate) struct MockBody {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    fail_after: Option<usize>,
    delay: Option<Duration>,
    _active: ActiveGuard,
}

impl ChunkStream for MockBody {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let limit = self.fail_after.unwrap_or(usize::MAX).min(self.data.len());
        if self.pos >= limit {
            if self.fail_after.is_some_and(|n| n < self.data.len()) {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )));
            }
            return Ok(None);
        }
        let end = (self.pos + self.chunk_size).min(limit);
        let chunk = self.data[self.pos..end].to_vec();
        self.pos = end;
        Ok(Some(chunk))
    }
}

fn requested_offset(headers: &[(String, String)]) -> Option<(String, u64)> {
    let (_, value) = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("range"))?;
    let start = value.strip_prefix("bytes=")?.strip_suffix('-')?;
    Some((value.clone(), start.parse().ok()?))
}

impl Transport for MockTransport {
    type Body = MockBody;

    async fn start(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<(ResponseMetadata, MockBody), TransportError> {
        let range = requested_offset(headers);
        self.ranges
            .lock()
            .unwrap()
            .push((url.to_string(), range.as_ref().map(|(raw, _)| raw.clone())));

        let resource = self.resources.lock().unwrap().get(url).cloned();
        let Some(resource) = resource else {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("could not connect to {url}"),
            )));
        };
        let active = ActiveGuard::enter(&self.counters);

        let total = resource.body.len() as u64;
        let (status, data) = match (resource.status_override, range) {
            (Some(status), _) if resource.body_on_override => (status, resource.body.clone()),
            (Some(status), _) => (status, Vec::new()),
            (None, Some((_, start))) if resource.honours_ranges => {
                if start >= total {
                    (416, Vec::new())
                } else {
                    (206, resource.body[start as usize..].to_vec())
                }
            }
            _ => (200, resource.body.clone()),
        };

        let meta = ResponseMetadata {
            status,
            content_type: Some("application/octet-stream".to_string()),
            content_length: (!resource.omit_length).then_some(data.len() as u64),
        };
        let body = MockBody {
            data,
            pos: 0,
            chunk_size: resource.chunk_size,
            fail_after: resource.fail_after,
            delay: resource.delay,
            _active: active,
        };
        Ok((meta, body))
    }
}
