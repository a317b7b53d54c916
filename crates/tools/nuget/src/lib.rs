//! NuGet transport for toolfeed.
//!
//! Implements the capabilities the core pipeline consumes:
//! - [`NuGetFeedReader`] lists package versions from a NuGet v3 flat-container feed
//! - [`HttpDownloader`] downloads packages atomically
//! - [`ZipUnpacker`] extracts `.nupkg` archives, optionally re-rooted at an inner path
//!
//! and wires them into the .NET integration provider.
//!
//! # Example
//!
//! ```ignore
//! use toolfeed_core::{FeedConfig, ToolProvider};
//! use toolfeed_nuget::dotnet_tool_provider;
//!
//! let provider = dotnet_tool_provider(FeedConfig::default())?;
//! let versions = provider.available_tool_versions();
//! let package = provider.fetch_tool_package(&versions[0], &downloads)?;
//! provider.unpack_tool_package(&package, &install_dir)?;
//! ```

mod dotnet;
mod download;
mod error;
mod feed;
mod unpack;

use reqwest::blocking::Client;
use std::time::Duration;

pub use dotnet::{
    DISPLAY_NAME, DotnetToolType, SHORT_DISPLAY_NAME, TARGET_FILE_DISPLAY_NAME,
    dotnet_tool_provider,
};
pub use download::HttpDownloader;
pub use error::{Error, Result};
pub use feed::{NuGetFeedReader, index_url, package_url};
pub use unpack::ZipUnpacker;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("toolfeed/", env!("CARGO_PKG_VERSION"));

/// Build the blocking HTTP client shared by the reader and the downloader.
fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(Error::Client)
}
