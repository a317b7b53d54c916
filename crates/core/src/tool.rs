//! Tool type metadata and tool descriptors.

use serde::{Deserialize, Serialize};

/// Static description of a tool type, shown by the host UI.
///
/// Carries no behavior. One value is built at startup and shared by every
/// component that labels tools with their type.
pub trait ToolTypeInfo: Send + Sync {
    /// Type identifier; also the prefix of tool version ids.
    fn type_id(&self) -> &str;

    /// Human-readable name.
    fn display_name(&self) -> &str;

    /// Short name for compact listings.
    fn short_display_name(&self) -> &str;

    /// One-line description of what the tool is for.
    fn description(&self) -> Option<&str> {
        None
    }

    /// Label for the package file in upload forms.
    fn target_file_display_name(&self) -> &str;

    /// Whether versions can be downloaded from the feed.
    fn supports_download(&self) -> bool {
        false
    }

    /// Project home page.
    fn tool_site_url(&self) -> Option<&str> {
        None
    }

    /// License page.
    fn tool_license_url(&self) -> Option<&str> {
        None
    }

    /// Help topic name in the host documentation.
    fn help_file(&self) -> Option<&str> {
        None
    }

    /// Explains what a valid package looks like (may contain HTML).
    fn valid_package_description(&self) -> Option<&str> {
        None
    }
}

/// Build the host identifier of a tool version.
#[must_use]
pub fn tool_version_id(tool_type: &str, version: &str) -> String {
    format!("{tool_type}.{version}")
}

/// A tool version as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolVersion {
    /// Tool type id.
    pub tool_type: String,
    /// Version string.
    pub version: String,
    /// Identifier, `<tool_type>.<version>`.
    pub id: String,
    /// Name shown in listings.
    pub display_name: String,
}

impl ToolVersion {
    /// Create a version of the given tool type.
    #[must_use]
    pub fn new(tool_type: &dyn ToolTypeInfo, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            tool_type: tool_type.type_id().to_string(),
            id: tool_version_id(tool_type.type_id(), &version),
            display_name: format!("{} {version}", tool_type.display_name()),
            version,
        }
    }
}

impl std::fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// A package advertised by the feed that can be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadableTool {
    /// Where the package is downloaded from.
    pub download_url: String,
    /// File name to store the package under, `<id>.<version><ext>`.
    pub destination_file_name: String,
    /// Version exactly as advertised by the feed.
    pub version: String,
    /// Tool type id.
    pub tool_type_id: String,
    /// Identifier, `<tool_type_id>.<version>`.
    pub display_id: String,
    /// Name shown in listings.
    pub display_name: String,
}

impl From<&DownloadableTool> for ToolVersion {
    fn from(tool: &DownloadableTool) -> Self {
        Self {
            tool_type: tool.tool_type_id.clone(),
            version: tool.version.clone(),
            id: tool.display_id.clone(),
            display_name: tool.display_name.clone(),
        }
    }
}
