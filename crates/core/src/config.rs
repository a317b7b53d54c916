//! Feed configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default feed: the public NuGet v3 flat container.
pub const DEFAULT_FEED_URL: &str = "https://api.nuget.org/v3-flatcontainer";

/// Package id of the .NET integration tool.
pub const DEFAULT_PACKAGE_ID: &str = "TeamCity.Dotnet.Integration";

/// Extension of feed-sourced packages, including the dot.
pub const DEFAULT_PACKAGE_EXTENSION: &str = ".nupkg";

/// Sub-path inside a feed package that holds the tool binaries.
pub const DEFAULT_BINARIES_PATH: &str = "build/_common";

/// How long a fetched version list stays fresh.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60 * 60;

/// Per-request timeout for the HTTP transport.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Fixed configuration shared by the fetcher, the cache and the provider.
///
/// Built once by the host and passed to every component that needs it.
/// Missing fields fall back to the .NET integration defaults, so a host can
/// deserialize a partial document:
///
/// ```
/// use toolfeed_core::FeedConfig;
///
/// let config: FeedConfig = serde_json::from_str(r#"{"refresh_interval_secs": 60}"#).unwrap();
/// assert_eq!(config.package_id, "TeamCity.Dotnet.Integration");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Base URL of the package feed.
    pub feed_url: String,
    /// Package id queried on the feed. Doubles as the tool type id.
    pub package_id: String,
    /// Package file extension, including the leading dot.
    pub package_extension: String,
    /// Path inside feed packages that is extracted on unpack.
    pub binaries_path: String,
    /// Age in seconds after which a `FetchNew` lookup queries the feed again.
    pub refresh_interval_secs: u64,
    /// Timeout in seconds for a single HTTP request.
    pub http_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            package_id: DEFAULT_PACKAGE_ID.to_string(),
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            binaries_path: DEFAULT_BINARIES_PATH.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl FeedConfig {
    /// Set the feed URL.
    #[must_use]
    pub fn with_feed_url(mut self, feed_url: impl Into<String>) -> Self {
        self.feed_url = feed_url.into();
        self
    }

    /// Set the refresh interval.
    ///
    /// The interval is stored in whole seconds; a fractional part rounds up.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        let fraction = u64::from(interval.subsec_nanos() > 0);
        self.refresh_interval_secs = interval.as_secs().saturating_add(fraction);
        self
    }

    /// Refresh interval as a [`Duration`].
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Prefix stripped from archive entries when unpacking a feed package.
    #[must_use]
    pub fn binaries_prefix(&self) -> String {
        format!("{}/", self.binaries_path.trim_end_matches('/'))
    }

    /// File name a feed package is stored under.
    #[must_use]
    pub fn package_file_name(&self, package_id: &str, version: &str) -> String {
        format!("{package_id}.{version}{}", self.package_extension)
    }
}
