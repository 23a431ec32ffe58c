//! Error types for the HTTP server.

use std::path::PathBuf;

use difflame_git::SourceError;
use thiserror::Error;
use warp::http::StatusCode;

/// Errors surfaced by the server, either at startup or per request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Requested file is not one the server was started with.
    #[error("File not served: {name}")]
    NotAllowed { name: String },

    /// File mode started without any files.
    #[error("No files to serve")]
    NoFiles,

    /// Diff extraction failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// I/O error on a served file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listen address could not be resolved.
    #[error("Cannot resolve address {address}: {message}")]
    Resolve { address: String, message: String },

    /// Listen address could not be bound.
    #[error("Cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: warp::Error,
    },

    /// A blocking diff task panicked or was cancelled.
    #[error("Diff task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status used when this error ends a request.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAllowed { .. } => StatusCode::NOT_FOUND,
            Self::Source(SourceError::Revision { .. } | SourceError::InvalidRevision { .. }) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl warp::reject::Reject for ServerError {}
