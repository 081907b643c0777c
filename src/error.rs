//! Error type for the fsindexer library.

use thiserror::Error;

/// Result alias used by the public fsindexer API.
pub type Result<T> = std::result::Result<T, Error>;

/// Library errors. Each variant is a distinct outcome callers can match on.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing input (path outside root, not a directory, duplicate job, ...).
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// Unknown job, unregistered record type, or absent table when creation is disabled.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record type cannot be mapped onto table columns.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Accepted request whose effect is not implemented (watch, delete, reindex).
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Cooperative shutdown interrupted a walk.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The indexer (or one of its background threads) has already shut down.
    #[error("indexer is closed")]
    Closed,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub fn bad_parameter(msg: impl Into<String>) -> Self {
        Self::BadParameter(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedType(msg.into())
    }

    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }
}
