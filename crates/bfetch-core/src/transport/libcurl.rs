//! libcurl transport.
//!
//! Each request runs a blocking `Easy` transfer on the tokio blocking pool.
//! The header callback reports the final response's metadata through a
//! oneshot as soon as its header block ends; the write callback hands body
//! chunks to the async side through a bounded channel, so a slow consumer
//! back-pressures the socket instead of buffering the body in memory.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use curl::easy::{Easy, List};
use tokio::sync::{mpsc, oneshot};

use super::parse::HeaderBlock;
use super::{ChunkStream, ResponseMetadata, Transport, TransportError};
use crate::config::FetchConfig;

/// Chunks buffered between the curl thread and the transfer loop.
const CHUNK_QUEUE_DEPTH: usize = 8;

type ChunkResult = Result<Vec<u8>, TransportError>;
type MetadataResult = Result<ResponseMetadata, TransportError>;

/// Session-wide request configuration, applied to every request.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Headers sent with every request (already validated and case-normalized).
    pub headers: Vec<(String, String)>,
    /// Rendered `Cookie` header value, if any cookies were given.
    pub cookie: Option<String>,
    pub user_agent: String,
    /// curl receive buffer size; upper bound for body chunk length.
    pub chunk_size: usize,
    pub connect_timeout: Duration,
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
}

impl SessionSettings {
    pub fn from_config(
        cfg: &FetchConfig,
        headers: Vec<(String, String)>,
        cookie: Option<String>,
    ) -> Self {
        Self {
            headers,
            cookie,
            user_agent: cfg.effective_user_agent(),
            chunk_size: cfg.chunk_size_bytes.max(1),
            connect_timeout: cfg.connect_timeout(),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: cfg.low_speed_time(),
            max_redirections: cfg.max_redirections,
        }
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

/// Production transport backed by libcurl.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    settings: Arc<SessionSettings>,
}

impl CurlTransport {
    pub fn new(settings: SessionSettings) -> Self {
        curl::init();
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }
}

/// Body of a curl response; chunks arrive from the transfer thread.
#[derive(Debug)]
pub struct CurlBody {
    chunks: mpsc::Receiver<ChunkResult>,
}

impl ChunkStream for CurlBody {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.chunks.recv().await {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

impl Transport for CurlTransport {
    type Body = CurlBody;

    async fn start(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<(ResponseMetadata, CurlBody), TransportError> {
        let (meta_tx, meta_rx) = oneshot::channel::<MetadataResult>();
        let (chunk_tx, chunk_rx) = mpsc::channel::<ChunkResult>(CHUNK_QUEUE_DEPTH);
        let settings = Arc::clone(&self.settings);
        let url = url.to_string();
        let extra = headers.to_vec();

        let worker = tokio::task::spawn_blocking(move || {
            run_transfer(&settings, &url, &extra, meta_tx, chunk_tx)
        });

        match meta_rx.await {
            Ok(Ok(meta)) => Ok((meta, CurlBody { chunks: chunk_rx })),
            Ok(Err(e)) => Err(e),
            Err(_) => match worker.await {
                Ok(Err(e)) => Err(e),
                Ok(Ok(())) => Err(TransportError::Worker(
                    "transfer ended before response headers".to_string(),
                )),
                Err(e) => Err(TransportError::Worker(e.to_string())),
            },
        }
    }
}

/// Header callback state: the block being parsed and the pending metadata reply.
struct HeaderState {
    block: HeaderBlock,
    reply: Option<oneshot::Sender<MetadataResult>>,
}

impl HeaderState {
    fn on_line(&mut self, data: &[u8]) {
        let Ok(line) = std::str::from_utf8(data) else {
            return;
        };
        if let Some(meta) = self.block.feed(line, true) {
            self.report(meta);
        }
    }

    /// Body bytes are arriving but no header block has ended (non-HTTP
    /// schemes). Report what is known now: the consumer must be listening on
    /// the chunk queue before it fills up.
    fn on_body(&mut self) {
        if self.reply.is_some() {
            let meta = self.block.metadata();
            self.report(meta);
        }
    }

    fn report(&mut self, meta: ResponseMetadata) {
        if let Some(reply) = self.reply.take() {
            tracing::debug!(status = meta.status, length = ?meta.content_length, "response headers");
            let _ = reply.send(Ok(meta));
        }
    }
}

fn configure(
    easy: &mut Easy,
    settings: &SessionSettings,
    url: &str,
    extra: &[(String, String)],
) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(settings.max_redirections)?;
    easy.connect_timeout(settings.connect_timeout)?;
    // Abort a stalled transfer instead of using a wall-clock timeout that would kill large files.
    easy.low_speed_limit(settings.low_speed_limit)?;
    easy.low_speed_time(settings.low_speed_time)?;
    easy.buffer_size(settings.chunk_size)?;

    let mut list = List::new();
    if !settings.has_header("user-agent") {
        list.append(&format!("User-Agent: {}", settings.user_agent))?;
    }
    for (k, v) in settings.headers.iter().chain(extra.iter()) {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    easy.http_headers(list)?;

    if let Some(cookie) = &settings.cookie {
        easy.cookie(cookie)?;
    }
    Ok(())
}

/// Runs one blocking transfer. Every outcome is reported through `meta_tx`
/// (before headers complete) or `chunk_tx` (afterwards); the return value only
/// matters when neither channel could carry it.
fn run_transfer(
    settings: &SessionSettings,
    url: &str,
    extra: &[(String, String)],
    meta_tx: oneshot::Sender<MetadataResult>,
    chunk_tx: mpsc::Sender<ChunkResult>,
) -> Result<(), TransportError> {
    let mut easy = Easy::new();
    if let Err(e) = configure(&mut easy, settings, url, extra) {
        let _ = meta_tx.send(Err(TransportError::Curl(e)));
        return Ok(());
    }

    let headers = RefCell::new(HeaderState {
        block: HeaderBlock::default(),
        reply: Some(meta_tx),
    });

    let result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            headers.borrow_mut().on_line(data);
            true
        })?;
        transfer.write_function(|data| {
            headers.borrow_mut().on_body();
            // A closed receiver means the body was dropped: returning 0 aborts the transfer.
            match chunk_tx.blocking_send(Ok(data.to_vec())) {
                Ok(()) => Ok(data.len()),
                Err(_) => Ok(0),
            }
        })?;
        transfer.perform()
    };

    let mut headers = headers.into_inner();
    match result {
        Ok(()) => {
            if let Some(reply) = headers.reply.take() {
                // No blank line seen (e.g. a non-HTTP scheme): report what curl knows.
                let mut meta = headers.block.metadata();
                if meta.status == 0 {
                    meta.status = easy.response_code().unwrap_or(0);
                }
                let _ = reply.send(Ok(meta));
            }
        }
        Err(e) => {
            if let Some(reply) = headers.reply.take() {
                let _ = reply.send(Err(TransportError::Curl(e)));
            } else if !(e.is_write_error() && chunk_tx.is_closed()) {
                tracing::debug!(url, "transfer failed mid-body: {}", e);
                let _ = chunk_tx.blocking_send(Err(TransportError::Curl(e)));
            }
        }
    }
    Ok(())
}
