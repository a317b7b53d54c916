//! Host-facing tool provider.
//!
//! The host discovers a [`ToolProvider`] and drives it through four calls:
//! list versions, resolve a version from an uploaded package, download a
//! version, unpack a package. [`FeedToolProvider`] answers them from a
//! [`FetchCache`] and the transport capabilities.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::Result;
use crate::cache::{FetchCache, FetchToolsPolicy};
use crate::config::FeedConfig;
use crate::error::ToolError;
use crate::tool::{ToolTypeInfo, ToolVersion};
use crate::transport::{Downloader, Unpacker};
use crate::version::PackageVersion;

/// Operations a host calls on a tool provider.
pub trait ToolProvider: Send + Sync {
    /// Metadata of the managed tool type.
    fn tool_type(&self) -> &dyn ToolTypeInfo;

    /// Versions that can be installed.
    ///
    /// May contain the same version twice when it is both registered
    /// statically and advertised by the feed.
    fn available_tool_versions(&self) -> Vec<ToolVersion>;

    /// Determine the version of a package file from its name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::VersionNotResolved`] when the name carries no
    /// version.
    fn try_get_package_version(&self, package: &Path) -> Result<ToolVersion>;

    /// Download a previously listed version into `target_dir`.
    ///
    /// Returns the path of the downloaded package.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::PackageNotFound`] if the version was never seen
    /// on the feed, or [`ToolError::Download`] if the transfer failed.
    fn fetch_tool_package(&self, version: &ToolVersion, target_dir: &Path) -> Result<PathBuf>;

    /// Unpack a package into `target_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Unpack`] if extraction failed.
    fn unpack_tool_package(&self, package: &Path, target_dir: &Path) -> Result<()>;
}

/// Tool provider backed by a package feed.
pub struct FeedToolProvider {
    config: Arc<FeedConfig>,
    tool_type: Arc<dyn ToolTypeInfo>,
    cache: Arc<FetchCache>,
    downloader: Arc<dyn Downloader>,
    unpacker: Arc<dyn Unpacker>,
    static_versions: Vec<ToolVersion>,
}

impl FeedToolProvider {
    /// Create a provider with no statically registered versions.
    #[must_use]
    pub fn new(
        config: Arc<FeedConfig>,
        tool_type: Arc<dyn ToolTypeInfo>,
        cache: Arc<FetchCache>,
        downloader: Arc<dyn Downloader>,
        unpacker: Arc<dyn Unpacker>,
    ) -> Self {
        Self {
            config,
            tool_type,
            cache,
            downloader,
            unpacker,
            static_versions: Vec::new(),
        }
    }

    /// Versions the host already knows about, listed before fetched ones.
    #[must_use]
    pub fn with_static_versions(mut self, versions: Vec<ToolVersion>) -> Self {
        self.static_versions = versions;
        self
    }

    /// The fetch cache behind this provider.
    #[must_use]
    pub fn cache(&self) -> &Arc<FetchCache> {
        &self.cache
    }

    /// Whether `package` looks like a package downloaded from the feed.
    fn is_feed_package(&self, package: &Path) -> bool {
        let Some(name) = package.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        package.is_file()
            && name.starts_with(self.config.package_id.as_str())
            && name.ends_with(self.config.package_extension.as_str())
            && PackageVersion::parse(name).is_some()
    }
}

impl ToolProvider for FeedToolProvider {
    fn tool_type(&self) -> &dyn ToolTypeInfo {
        self.tool_type.as_ref()
    }

    fn available_tool_versions(&self) -> Vec<ToolVersion> {
        let fetched = self.cache.get(FetchToolsPolicy::FetchNew);
        self.static_versions
            .iter()
            .cloned()
            .chain(fetched.iter().map(ToolVersion::from))
            .collect()
    }

    fn try_get_package_version(&self, package: &Path) -> Result<ToolVersion> {
        let name = package
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ToolError::version_not_resolved(package))?;
        let version =
            PackageVersion::parse(name).ok_or_else(|| ToolError::version_not_resolved(package))?;

        debug!(?package, %version, "Resolved package version");
        Ok(ToolVersion::new(self.tool_type.as_ref(), version.to_string()))
    }

    fn fetch_tool_package(&self, version: &ToolVersion, target_dir: &Path) -> Result<PathBuf> {
        info!(version = %version.display_name, "Start installing package");

        let tool = self
            .cache
            .get(FetchToolsPolicy::ReturnCached)
            .into_iter()
            .find(|tool| tool.version == version.version)
            .ok_or_else(|| ToolError::package_not_found(version.to_string()))?;

        let location = target_dir.join(&tool.destination_file_name);
        info!(url = %tool.download_url, "Downloading package");
        self.downloader
            .download(&tool.download_url, &location)
            .map_err(|e| ToolError::download(version.to_string(), &location, e))?;

        debug!(%version, ?location, "Downloaded package");
        Ok(location)
    }

    fn unpack_tool_package(&self, package: &Path, target_dir: &Path) -> Result<()> {
        let prefix = if self.is_feed_package(package) {
            self.config.binaries_prefix()
        } else {
            String::new()
        };

        debug!(?package, ?target_dir, %prefix, "Unpacking package");
        if self.unpacker.unpack(package, &prefix, target_dir) {
            Ok(())
        } else {
            Err(ToolError::unpack(package, target_dir))
        }
    }
}

impl std::fmt::Debug for FeedToolProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedToolProvider")
            .field("tool_type", &self.tool_type.type_id())
            .field("config", &self.config)
            .field("static_versions", &self.static_versions.len())
            .finish_non_exhaustive()
    }
}
