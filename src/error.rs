use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("malformed form segment {segment:?}: expected exactly one '='")]
    MalformedSegment { segment: String },

    #[error("record store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("record store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record store document is not a JSON object")]
    NotAnObject,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("failed to resolve relay target {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("relay target {target} resolved to no addresses")]
    NoAddress { target: String },

    #[error("relay socket error: {0}")]
    Io(#[from] io::Error),

    #[error("datagram truncated: sent {sent} of {len} bytes")]
    Truncated { sent: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum ReceiverError {
    #[error("failed to bind datagram receiver on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("datagram receive failed: {0}")]
    Recv(#[source] io::Error),
}
