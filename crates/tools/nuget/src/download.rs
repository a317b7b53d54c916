//! Package downloads over HTTP.

use reqwest::blocking::Client;
use std::io;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use toolfeed_core::Downloader;
use tracing::debug;

use crate::{Error, Result, http_client};

/// Downloads packages by streaming them to disk.
///
/// The body is written to a temporary file next to the destination and
/// renamed into place once complete, so a failed transfer leaves nothing
/// behind and a successful one leaves exactly one file.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?))
    }

    /// Create a downloader using an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Download `url` to `destination`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// filesystem failure.
    pub fn download_to(&self, url: &str, destination: &Path) -> Result<u64> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        debug!(%url, ?destination, "Downloading");
        let mut response = self.client.get(url).send().map_err(|e| Error::http(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::unexpected_status(url, status));
        }

        let mut temp = NamedTempFile::new_in(parent)?;
        let bytes = io::copy(&mut response, &mut temp)?;
        temp.as_file().sync_all()?;
        temp.persist(destination).map_err(|e| e.error)?;

        debug!(%url, ?destination, bytes, "Download complete");
        Ok(bytes)
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, destination: &Path) -> io::Result<()> {
        self.download_to(url, destination)
            .map(|_| ())
            .map_err(io::Error::from)
    }
}
