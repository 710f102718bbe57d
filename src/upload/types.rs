use std::path::PathBuf;

use thiserror::Error;

/// Events sent from the transfer worker back to the UI thread.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    Progress { loaded: u64, total: u64 },
    Completed,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("storage backend returned no upload id")]
    MissingUploadId,

    #[error("storage backend returned no etag for part {0}")]
    MissingETag(i32),
}
