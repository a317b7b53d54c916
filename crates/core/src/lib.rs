//! Tool discovery and provisioning from a package feed.
//!
//! The pipeline, leaves first:
//!
//! - [`PackageVersion`] - canonical `major.minor.build[-label]` versions
//!   parsed from feed versions and package file names
//! - [`FeedToolsFetcher`] - queries a [`FeedReader`] and keeps the entries
//!   that carry a valid version
//! - [`FetchCache`] - remembers the last successful fetch and refreshes it
//!   according to a [`FetchToolsPolicy`]
//! - [`FeedToolProvider`] - the [`ToolProvider`] the host talks to
//!
//! Network access, downloads and archive extraction are capabilities
//! ([`FeedReader`], [`Downloader`], [`Unpacker`]) supplied by a feed
//! provider crate.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use toolfeed_core::{FeedConfig, FeedToolsFetcher, FetchCache, FeedToolProvider, ToolProvider};
//!
//! let config = Arc::new(FeedConfig::default());
//! let fetcher = FeedToolsFetcher::new(reader, Arc::clone(&config), Arc::clone(&tool_type));
//! let cache = Arc::new(FetchCache::new(vec![Arc::new(fetcher)], config.refresh_interval()));
//! let provider = FeedToolProvider::new(config, tool_type, cache, downloader, unpacker);
//!
//! for version in provider.available_tool_versions() {
//!     println!("{}", version.display_name);
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod provider;
pub mod tool;
pub mod transport;
pub mod version;

pub use cache::{CachedFetchResult, FetchCache, FetchToolsPolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use error::{FetchError, Result, ToolError};
pub use fetcher::{AvailableToolsFetcher, FeedToolsFetcher};
pub use provider::{FeedToolProvider, ToolProvider};
pub use tool::{DownloadableTool, ToolTypeInfo, ToolVersion, tool_version_id};
pub use transport::{Downloader, FeedEntry, FeedReader, Unpacker};
pub use version::{PackageVersion, ParseVersionError};
