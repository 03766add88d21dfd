//! Incremental parsing of response header lines into ResponseMetadata.

use super::ResponseMetadata;

/// Accumulates one response header block at a time. Interim (1xx) and
/// followed-redirect blocks are discarded; the first block that ends without
/// being superseded is the response that carries the body.
#[derive(Debug, Default)]
pub(crate) struct HeaderBlock {
    status: Option<u32>,
    content_type: Option<String>,
    content_length: Option<u64>,
    has_location: bool,
}

impl HeaderBlock {
    /// Feed one raw header line. Returns the metadata when `line` terminates the final block.
    pub(crate) fn feed(&mut self, line: &str, follow_redirects: bool) -> Option<ResponseMetadata> {
        let line = line.trim_end_matches(['\r', '\n']);

        if line.starts_with("HTTP/") {
            *self = HeaderBlock {
                status: parse_status_line(line),
                ..HeaderBlock::default()
            };
            return None;
        }

        if line.is_empty() {
            let status = self.status?;
            let interim = (100..200).contains(&status);
            let redirected = follow_redirects && (300..400).contains(&status) && self.has_location;
            if interim || redirected {
                *self = HeaderBlock::default();
                return None;
            }
            return Some(self.metadata());
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                self.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("content-type") {
                let media = value.split(';').next().unwrap_or("").trim();
                if !media.is_empty() {
                    self.content_type = Some(media.to_ascii_lowercase());
                }
            } else if name.eq_ignore_ascii_case("location") {
                self.has_location = true;
            }
        }
        None
    }

    /// Metadata from whatever has been seen so far.
    pub(crate) fn metadata(&self) -> ResponseMetadata {
        ResponseMetadata {
            status: self.status.unwrap_or(0),
            content_type: self.content_type.clone(),
            content_length: self.content_length,
        }
    }
}

fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse::<u32>().ok()
}
