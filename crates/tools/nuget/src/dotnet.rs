//! The .NET integration tool type and its ready-made provider.

use std::sync::Arc;
use toolfeed_core::{
    AvailableToolsFetcher, FeedConfig, FeedToolProvider, FeedToolsFetcher, FetchCache,
    ToolTypeInfo,
};
use tracing::debug;

use crate::{HttpDownloader, NuGetFeedReader, Result, ZipUnpacker};

/// Display name of the .NET integration tool.
pub const DISPLAY_NAME: &str = ".NET CLI Integration";

/// Short display name of the .NET integration tool.
pub const SHORT_DISPLAY_NAME: &str = ".NET Integration";

/// Label of the package file in upload forms.
pub const TARGET_FILE_DISPLAY_NAME: &str = ".NET integration package";

/// Metadata of the .NET integration package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotnetToolType {
    package_id: String,
    valid_package_description: String,
}

impl Default for DotnetToolType {
    fn default() -> Self {
        Self::new(toolfeed_core::config::DEFAULT_PACKAGE_ID)
    }
}

impl DotnetToolType {
    /// Create the tool type for packages published under `package_id`.
    #[must_use]
    pub fn new(package_id: impl Into<String>) -> Self {
        let package_id = package_id.into();
        let valid_package_description = format!(
            "Specify the path to a {DISPLAY_NAME} (.nupkg).\n\
             <br/>Download <em>{package_id}.&lt;VERSION&gt;.nupkg</em> from\n\
             <a href=\"https://www.nuget.org/packages/{package_id}/\" target=\"_blank\">www.nuget.org</a>"
        );
        Self {
            package_id,
            valid_package_description,
        }
    }
}

impl ToolTypeInfo for DotnetToolType {
    fn type_id(&self) -> &str {
        &self.package_id
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn short_display_name(&self) -> &str {
        SHORT_DISPLAY_NAME
    }

    fn description(&self) -> Option<&str> {
        Some("Is used in the .NET build runner to report build and test progress.")
    }

    fn target_file_display_name(&self) -> &str {
        TARGET_FILE_DISPLAY_NAME
    }

    fn supports_download(&self) -> bool {
        true
    }

    fn tool_site_url(&self) -> Option<&str> {
        Some("https://github.com/JetBrains/TeamCity.MSBuild.Logger/")
    }

    fn tool_license_url(&self) -> Option<&str> {
        Some("https://github.com/JetBrains/TeamCity.MSBuild.Logger/blob/master/LICENSE")
    }

    fn help_file(&self) -> Option<&str> {
        Some("DotnetIntegration")
    }

    fn valid_package_description(&self) -> Option<&str> {
        Some(&self.valid_package_description)
    }
}

/// Build the .NET integration provider backed by the NuGet feed in `config`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be initialized.
pub fn dotnet_tool_provider(config: FeedConfig) -> Result<FeedToolProvider> {
    let config = Arc::new(config);
    let tool_type: Arc<dyn ToolTypeInfo> = Arc::new(DotnetToolType::new(&config.package_id));

    let reader = NuGetFeedReader::new(config.http_timeout())?;
    let downloader = HttpDownloader::new(config.http_timeout())?;
    let fetcher: Arc<dyn AvailableToolsFetcher> = Arc::new(FeedToolsFetcher::new(
        reader,
        Arc::clone(&config),
        Arc::clone(&tool_type),
    ));
    let cache = Arc::new(FetchCache::new(vec![fetcher], config.refresh_interval()));

    debug!(feed_url = %config.feed_url, package_id = %config.package_id, "Created .NET tool provider");
    Ok(FeedToolProvider::new(
        config,
        tool_type,
        cache,
        Arc::new(downloader),
        Arc::new(ZipUnpacker::new()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolfeed_core::ToolProvider;

    #[test]
    fn test_default_type_id() {
        assert_eq!(DotnetToolType::default().type_id(), "TeamCity.Dotnet.Integration");
    }

    #[test]
    fn test_metadata() {
        let tool_type = DotnetToolType::default();
        assert_eq!(tool_type.display_name(), DISPLAY_NAME);
        assert_eq!(tool_type.short_display_name(), SHORT_DISPLAY_NAME);
        assert!(tool_type.supports_download());
        assert_eq!(tool_type.help_file(), Some("DotnetIntegration"));
        assert!(tool_type.tool_license_url().unwrap().ends_with("LICENSE"));
    }

    #[test]
    fn test_valid_package_description_names_package() {
        let description = DotnetToolType::new("My.Tool")
            .valid_package_description()
            .unwrap()
            .to_string();
        assert!(description.contains("My.Tool.&lt;VERSION&gt;.nupkg"));
        assert!(description.contains("https://www.nuget.org/packages/My.Tool/"));
    }

    #[test]
    fn test_provider_uses_configured_package_id() {
        let config = FeedConfig {
            package_id: "Custom.Tool".into(),
            ..FeedConfig::default()
        };
        let provider = dotnet_tool_provider(config).unwrap();
        assert_eq!(provider.tool_type().type_id(), "Custom.Tool");
        assert!(provider.cache().snapshot().is_none());
    }
}
