//! Destination file I/O.
//!
//! A transfer owns its destination exclusively: it is opened once, either
//! truncated (fresh download or server ignored the range) or appended to
//! (server honoured the range), written chunk by chunk, and closed on every
//! exit path when the writer is dropped.

mod writer;

pub use writer::DestinationWriter;

/// How the destination is opened for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start from empty, discarding any previous content.
    Truncate,
    /// Keep existing bytes and continue at the end of the file.
    Append,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn truncate_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"stale partial content").unwrap();

        let mut writer = DestinationWriter::open(&path, WriteMode::Truncate)
            .await
            .unwrap();
        writer.write_chunk(b"fresh").await.unwrap();
        assert_eq!(writer.finish().await.unwrap(), 5);

        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn append_keeps_existing_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"hello ").unwrap();

        let mut writer = DestinationWriter::open(&path, WriteMode::Append)
            .await
            .unwrap();
        writer.write_chunk(b"wor").await.unwrap();
        writer.write_chunk(b"ld").await.unwrap();
        assert_eq!(writer.written(), 5);
        writer.finish().await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn close_keeps_bytes_written_so_far() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let mut writer = DestinationWriter::open(&path, WriteMode::Truncate)
            .await
            .unwrap();
        writer.write_chunk(b"partial").await.unwrap();
        writer.close().await;
        assert_eq!(std::fs::read(&path).unwrap(), b"partial");
    }

    #[tokio::test]
    async fn open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.bin");
        assert!(DestinationWriter::open(&path, WriteMode::Truncate)
            .await
            .is_err());
    }
}
