//! Error types for tool discovery and provisioning.
//!
//! Two layers exist. [`FetchError`] is raised by a fetcher when the feed
//! cannot be reached; the fetch cache absorbs it. [`ToolError`] is what the
//! host sees when a lookup, download or unpack cannot be completed.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for host-facing tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// The feed could not be queried.
#[derive(Error, Debug)]
#[error("Failed to fetch versions from: {feed_url}")]
pub struct FetchError {
    /// Feed that was queried.
    pub feed_url: String,
    /// Underlying transport failure.
    #[source]
    pub source: io::Error,
}

impl FetchError {
    /// Create a fetch error for the given feed.
    #[must_use]
    pub fn new(feed_url: impl Into<String>, source: io::Error) -> Self {
        Self {
            feed_url: feed_url.into(),
            source,
        }
    }
}

/// Errors reported to the host by a tool provider.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ToolError {
    /// The package file name does not carry a version.
    #[error("Failed to get version of {}", package.display())]
    VersionNotResolved {
        /// The package file that was inspected.
        package: PathBuf,
    },

    /// No fetched package matches the requested version.
    #[error("Failed to find package {version}")]
    PackageNotFound {
        /// The requested version.
        version: String,
    },

    /// Downloading the package failed.
    #[error("Failed to download package {version} to {}: {source}", path.display())]
    Download {
        /// The version being downloaded.
        version: String,
        /// Where the package was to be written.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Unpacking the package failed.
    #[error("Failed to unpack package {} to {}", package.display(), target.display())]
    Unpack {
        /// The package archive.
        package: PathBuf,
        /// The directory it was unpacked into.
        target: PathBuf,
    },
}

impl ToolError {
    /// Create a version-not-resolved error.
    #[must_use]
    pub fn version_not_resolved(package: &Path) -> Self {
        Self::VersionNotResolved {
            package: package.to_path_buf(),
        }
    }

    /// Create a package-not-found error.
    #[must_use]
    pub fn package_not_found(version: impl Into<String>) -> Self {
        Self::PackageNotFound {
            version: version.into(),
        }
    }

    /// Create a download error.
    #[must_use]
    pub fn download(version: impl Into<String>, path: &Path, source: io::Error) -> Self {
        Self::Download {
            version: version.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create an unpack error.
    #[must_use]
    pub fn unpack(package: &Path, target: &Path) -> Self {
        Self::Unpack {
            package: package.to_path_buf(),
            target: target.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_fetch_error_names_feed() {
        let err = FetchError::new(
            "https://feed.example/v3",
            io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to fetch versions from: https://feed.example/v3"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_version_not_resolved_names_file() {
        let err = ToolError::version_not_resolved(Path::new("/tmp/garbage.zip"));
        assert_eq!(err.to_string(), "Failed to get version of /tmp/garbage.zip");
    }

    #[test]
    fn test_package_not_found_names_version() {
        let err = ToolError::package_not_found("9.9.9");
        assert!(err.to_string().contains("9.9.9"));
    }

    #[test]
    fn test_download_error_carries_cause() {
        let err = ToolError::download(
            "1.2.3",
            Path::new("/opt/tools/pkg.1.2.3.nupkg"),
            io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        );
        let message = err.to_string();
        assert!(message.contains("1.2.3"));
        assert!(message.contains("/opt/tools/pkg.1.2.3.nupkg"));
        assert!(message.contains("connection refused"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_unpack_error_has_no_cause() {
        let err = ToolError::unpack(Path::new("/a/pkg.nupkg"), Path::new("/b"));
        assert_eq!(err.to_string(), "Failed to unpack package /a/pkg.nupkg to /b");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ToolError>();
        assert_send_sync::<FetchError>();
    }
}
