//! Turns feed entries into downloadable tools.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::tool::{DownloadableTool, ToolTypeInfo, tool_version_id};
use crate::transport::{FeedEntry, FeedReader};
use crate::version::PackageVersion;

/// Source of available tool versions.
pub trait AvailableToolsFetcher: Send + Sync {
    /// Fetch the tools currently offered.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the source cannot be reached. Entries
    /// that are not valid versions are dropped, not reported.
    fn fetch_available(&self) -> Result<Vec<DownloadableTool>, FetchError>;
}

/// Fetcher backed by a package feed.
pub struct FeedToolsFetcher<R> {
    reader: R,
    config: Arc<FeedConfig>,
    tool_type: Arc<dyn ToolTypeInfo>,
}

impl<R: FeedReader> FeedToolsFetcher<R> {
    /// Create a fetcher querying `config.feed_url` for `config.package_id`.
    #[must_use]
    pub fn new(reader: R, config: Arc<FeedConfig>, tool_type: Arc<dyn ToolTypeInfo>) -> Self {
        Self {
            reader,
            config,
            tool_type,
        }
    }

    fn to_downloadable(&self, entry: FeedEntry) -> DownloadableTool {
        let type_id = self.tool_type.type_id();
        DownloadableTool {
            destination_file_name: self
                .config
                .package_file_name(&entry.package_id, &entry.package_version),
            tool_type_id: type_id.to_string(),
            display_id: tool_version_id(type_id, &entry.package_version),
            display_name: format!(
                "{} {}",
                self.tool_type.display_name(),
                entry.package_version
            ),
            download_url: entry.download_url,
            version: entry.package_version,
        }
    }
}

impl<R: FeedReader> AvailableToolsFetcher for FeedToolsFetcher<R> {
    fn fetch_available(&self) -> Result<Vec<DownloadableTool>, FetchError> {
        let feed_url = &self.config.feed_url;
        let package_id = &self.config.package_id;
        debug!(%feed_url, %package_id, "Querying package feed");

        let entries = self
            .reader
            .query_package_versions(feed_url, package_id)
            .map_err(|e| {
                debug!(%feed_url, error = %e, "Feed query failed");
                FetchError::new(feed_url.clone(), e)
            })?;

        let total = entries.len();
        let tools: Vec<_> = entries
            .into_iter()
            .filter(|entry| {
                let valid = PackageVersion::parse(&entry.package_version).is_some();
                if !valid {
                    debug!(version = %entry.package_version, "Skipping feed entry with invalid version");
                }
                valid
            })
            .map(|entry| self.to_downloadable(entry))
            .collect();

        info!(%package_id, total, available = tools.len(), "Fetched available versions");
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct StaticType;

    impl ToolTypeInfo for StaticType {
        fn type_id(&self) -> &str {
            "TeamCity.Dotnet.Integration"
        }

        fn display_name(&self) -> &str {
            ".NET Integration"
        }

        fn short_display_name(&self) -> &str {
            ".NET"
        }

        fn target_file_display_name(&self) -> &str {
            ".NET integration package"
        }
    }

    struct FixedFeed(Vec<(&'static str, &'static str)>);

    impl FeedReader for FixedFeed {
        fn query_package_versions(
            &self,
            _feed_url: &str,
            package_id: &str,
        ) -> io::Result<Vec<FeedEntry>> {
            Ok(self
                .0
                .iter()
                .map(|(version, url)| FeedEntry {
                    package_id: package_id.to_string(),
                    package_version: (*version).to_string(),
                    download_url: (*url).to_string(),
                })
                .collect())
        }
    }

    struct BrokenFeed;

    impl FeedReader for BrokenFeed {
        fn query_package_versions(&self, _: &str, _: &str) -> io::Result<Vec<FeedEntry>> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"))
        }
    }

    fn fetcher<R: FeedReader>(reader: R) -> FeedToolsFetcher<R> {
        FeedToolsFetcher::new(reader, Arc::new(FeedConfig::default()), Arc::new(StaticType))
    }

    #[test]
    fn test_drops_unparseable_entries_in_order() {
        let fetcher = fetcher(FixedFeed(vec![
            ("1.2.3", "u1"),
            ("bogus", "u2"),
            ("2.0.0-beta", "u3"),
        ]));

        let tools = fetcher.fetch_available().unwrap();
        let versions: Vec<_> = tools.iter().map(|t| t.version.as_str()).collect();
        assert_eq!(versions, ["1.2.3", "2.0.0-beta"]);
        assert_eq!(tools[0].download_url, "u1");
        assert_eq!(tools[1].download_url, "u3");
    }

    #[test]
    fn test_maps_entry_fields() {
        let fetcher = fetcher(FixedFeed(vec![("1.0.27-beta", "https://feed/pkg")]));
        let tool = fetcher.fetch_available().unwrap().remove(0);

        assert_eq!(
            tool.destination_file_name,
            "TeamCity.Dotnet.Integration.1.0.27-beta.nupkg"
        );
        assert_eq!(tool.tool_type_id, "TeamCity.Dotnet.Integration");
        assert_eq!(tool.display_id, "TeamCity.Dotnet.Integration.1.0.27-beta");
        assert_eq!(tool.display_name, ".NET Integration 1.0.27-beta");
    }

    #[test]
    fn test_empty_feed_is_success() {
        let fetcher = fetcher(FixedFeed(vec![]));
        assert!(fetcher.fetch_available().unwrap().is_empty());
    }

    #[test]
    fn test_transport_failure_becomes_fetch_error() {
        let err = fetcher(BrokenFeed).fetch_available().unwrap_err();
        assert_eq!(err.feed_url, crate::config::DEFAULT_FEED_URL);
        assert_eq!(err.source.kind(), io::ErrorKind::ConnectionReset);
    }
}
