//! Error types for NuGet transport operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for NuGet transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a feed or handling packages.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The HTTP request could not be completed.
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        /// Requested URL.
        url: String,
        /// Client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
    },

    /// The feed's version index could not be decoded.
    #[error("Invalid version index from {url}: {source}")]
    InvalidIndex {
        /// Index URL.
        url: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// The package is not a readable zip archive.
    #[error("Invalid archive {}: {source}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an HTTP error.
    #[must_use]
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    /// Create an unexpected status error.
    #[must_use]
    pub fn unexpected_status(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status: status.as_u16(),
        }
    }

    /// Create an archive error.
    #[must_use]
    pub fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e,
            other => {
                let kind = match &other {
                    Error::Http { source, .. } if source.is_timeout() => io::ErrorKind::TimedOut,
                    Error::InvalidIndex { .. } | Error::Archive { .. } => {
                        io::ErrorKind::InvalidData
                    }
                    _ => io::ErrorKind::Other,
                };
                Self::new(kind, other)
            }
        }
    }
}
