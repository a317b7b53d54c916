//! Capabilities the pipeline consumes from the outside world.
//!
//! The core never talks to the network or unzips anything itself. A feed
//! provider crate supplies these three implementations.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A package version as listed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Package id.
    pub package_id: String,
    /// Version as advertised, unparsed.
    pub package_version: String,
    /// Where the package file can be downloaded.
    pub download_url: String,
}

/// Queries a package feed.
pub trait FeedReader: Send + Sync {
    /// List every published version of `package_id` on `feed_url`.
    ///
    /// # Errors
    ///
    /// Returns an I/O-kind error when the feed cannot be reached or
    /// answers with something other than a version list.
    fn query_package_versions(&self, feed_url: &str, package_id: &str)
    -> io::Result<Vec<FeedEntry>>;
}

impl<T: FeedReader + ?Sized> FeedReader for Arc<T> {
    fn query_package_versions(
        &self,
        feed_url: &str,
        package_id: &str,
    ) -> io::Result<Vec<FeedEntry>> {
        (**self).query_package_versions(feed_url, package_id)
    }
}

/// Downloads a URL to a file.
pub trait Downloader: Send + Sync {
    /// Download `url` into `destination`.
    ///
    /// On success exactly one file exists at `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or filesystem failure.
    fn download(&self, url: &str, destination: &Path) -> io::Result<()>;
}

/// Extracts an archive into a directory.
pub trait Unpacker: Send + Sync {
    /// Extract `archive` into `destination`.
    ///
    /// With a non-empty `path_prefix` only entries below that prefix are
    /// extracted, with the prefix removed from their paths. Returns `false`
    /// on failure; the implementation logs its own diagnostics.
    fn unpack(&self, archive: &Path, path_prefix: &str, destination: &Path) -> bool;
}
