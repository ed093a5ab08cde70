//! Error taxonomy for the indexing pipeline.
//!
//! Filesystem and remote-index failures are fatal and bubble up to the CLI,
//! which turns them into a non-zero exit. Malformed front matter is *not* an
//! error: the parser recovers locally (see [`crate::frontmatter`]).

use std::path::PathBuf;

/// Every failure the pipeline can surface to its caller.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Missing or invalid credential, index name, app id or config value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The content root or an individual document could not be read.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed below the content root.
    #[error("failed to walk content tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A clear, batch or task call against the remote index failed.
    #[error("remote index {operation} failed: {message}")]
    RemoteIndex {
        operation: &'static str,
        message: String,
    },
}

impl IndexerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        IndexerError::Configuration(message.into())
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexerError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        IndexerError::RemoteIndex {
            operation,
            message: message.into(),
        }
    }
}

pub type Result<T, E = IndexerError> = std::result::Result<T, E>;
