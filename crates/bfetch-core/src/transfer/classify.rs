//! Response classification: pairs the resume intent with the response status.

use crate::resume::ResumeIntent;
use crate::storage::WriteMode;
use crate::transport::ResponseMetadata;

pub(crate) const STATUS_PARTIAL_CONTENT: u32 = 206;
pub(crate) const STATUS_RANGE_NOT_SATISFIABLE: u32 = 416;

/// What the streaming phase does with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan {
    /// The local file already holds the whole resource; nothing to write.
    Satisfied { existing: u64 },
    /// Stream the body. `base` is the byte count already on disk before the
    /// first chunk (non-zero only when appending).
    Stream {
        mode: WriteMode,
        base: u64,
        total: Option<u64>,
    },
    /// Error status; the body is discarded unread.
    Reject { status: u32 },
}

pub(crate) fn classify(intent: ResumeIntent, meta: &ResponseMetadata) -> Plan {
    let status = meta.status;
    match intent {
        ResumeIntent::Resume { existing } => match status {
            STATUS_RANGE_NOT_SATISFIABLE => Plan::Satisfied { existing },
            STATUS_PARTIAL_CONTENT => Plan::Stream {
                mode: WriteMode::Append,
                base: existing,
                // A length that cannot be added to the prefix is as good as none.
                total: meta
                    .content_length
                    .and_then(|remaining| existing.checked_add(remaining)),
            },
            // Range ignored: the body is the whole resource, so the old prefix must go.
            200..=299 => fresh(meta),
            _ => Plan::Reject { status },
        },
        ResumeIntent::Fresh => match status {
            200..=299 => fresh(meta),
            _ => Plan::Reject { status },
        },
    }
}

fn fresh(meta: &ResponseMetadata) -> Plan {
    Plan::Stream {
        mode: WriteMode::Truncate,
        base: 0,
        total: meta.content_length,
    }
}
