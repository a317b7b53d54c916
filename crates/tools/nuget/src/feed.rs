//! NuGet v3 flat-container feed reader.
//!
//! The flat container publishes one JSON index per package:
//!
//! ```text
//! GET {feed}/{id-lower}/index.json  ->  {"versions": ["1.0.0", "1.0.1-beta"]}
//! ```
//!
//! and serves each package at
//! `{feed}/{id-lower}/{version-lower}/{id-lower}.{version-lower}.nupkg`.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::io;
use std::time::Duration;
use toolfeed_core::{FeedEntry, FeedReader};
use tracing::{debug, trace};

use crate::{Error, Result, http_client};

/// Version index document of one package.
#[derive(Debug, Deserialize)]
struct VersionIndex {
    #[serde(default)]
    versions: Vec<String>,
}

/// Reads package versions from a NuGet v3 flat-container feed.
#[derive(Debug, Clone)]
pub struct NuGetFeedReader {
    client: Client,
}

impl NuGetFeedReader {
    /// Create a reader whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?))
    }

    /// Create a reader using an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Query the feed for all versions of `package_id`.
    ///
    /// A package the feed does not know yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, on a non-success status other
    /// than 404, or when the index cannot be decoded.
    pub fn query(&self, feed_url: &str, package_id: &str) -> Result<Vec<FeedEntry>> {
        let url = index_url(feed_url, package_id);
        debug!(%url, "Fetching NuGet version index");

        let response = self.client.get(&url).send().map_err(|e| Error::http(&url, e))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%package_id, "Package not found on feed");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(Error::unexpected_status(&url, status));
        }

        let body = response.text().map_err(|e| Error::http(&url, e))?;
        trace!(bytes = body.len(), "Received version index");
        entries_from_index(feed_url, package_id, &url, &body)
    }
}

impl FeedReader for NuGetFeedReader {
    fn query_package_versions(
        &self,
        feed_url: &str,
        package_id: &str,
    ) -> io::Result<Vec<FeedEntry>> {
        self.query(feed_url, package_id).map_err(io::Error::from)
    }
}

fn feed_base(feed_url: &str) -> &str {
    feed_url.trim_end_matches('/')
}

/// URL of the version index of `package_id`.
#[must_use]
pub fn index_url(feed_url: &str, package_id: &str) -> String {
    format!(
        "{}/{}/index.json",
        feed_base(feed_url),
        package_id.to_lowercase()
    )
}

/// Download URL of one package version.
#[must_use]
pub fn package_url(feed_url: &str, package_id: &str, version: &str) -> String {
    let id = package_id.to_lowercase();
    let version = version.to_lowercase();
    format!("{}/{id}/{version}/{id}.{version}.nupkg", feed_base(feed_url))
}

/// Convert an index document into feed entries, keeping document order.
fn entries_from_index(
    feed_url: &str,
    package_id: &str,
    index_url: &str,
    body: &str,
) -> Result<Vec<FeedEntry>> {
    let index: VersionIndex = serde_json::from_str(body).map_err(|source| Error::InvalidIndex {
        url: index_url.to_string(),
        source,
    })?;

    Ok(index
        .versions
        .into_iter()
        .map(|version| FeedEntry {
            package_id: package_id.to_string(),
            download_url: package_url(feed_url, package_id, &version),
            package_version: version,
        })
        .collect())
}
