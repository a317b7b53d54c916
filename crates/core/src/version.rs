//! Canonical package versions.
//!
//! Feeds and package file names carry versions in a loose form such as
//! `TeamCity.Dotnet.Integration.1.0.27-beta.nupkg`. [`PackageVersion::parse`]
//! extracts the `major.minor.build[-label]` core from such strings and
//! rejects everything else. Rejection is a filtering signal, not an error.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

#[allow(clippy::expect_used)]
static PACKAGE_VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i-u)(?:^[a-z.]+\.|^)(?P<major>[0-9]+)\.(?P<minor>[0-9]+)\.(?P<build>[0-9]+)(?:-(?P<label>[a-z0-9_]+))?(?:\.nupkg)?$",
    )
    .expect("package version pattern is a valid literal")
});

/// A parsed `major.minor.build[-label]` version.
///
/// The label is the empty string when the source had none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
    major: u32,
    minor: u32,
    build: u32,
    label: String,
}

impl PackageVersion {
    /// Parse a raw version or package file name.
    ///
    /// Accepts an optional dotted package id prefix and an optional
    /// `.nupkg` extension. Returns `None` when any of the three numeric
    /// groups is missing or the string has any other shape. Digits, labels
    /// and case folding are ASCII only. Whitespace is not trimmed.
    ///
    /// ```
    /// use toolfeed_core::PackageVersion;
    ///
    /// let v = PackageVersion::parse("my.pkg.1.2.3-beta").unwrap();
    /// assert_eq!((v.major(), v.minor(), v.build(), v.label()), (1, 2, 3, "beta"));
    /// assert!(PackageVersion::parse("1.2").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = PACKAGE_VERSION_PATTERN.captures(raw)?;
        Some(Self {
            major: captures.name("major")?.as_str().parse().ok()?,
            minor: captures.name("minor")?.as_str().parse().ok()?,
            build: captures.name("build")?.as_str().parse().ok()?,
            label: captures
                .name("label")
                .map_or_else(String::new, |m| m.as_str().to_string()),
        })
    }

    /// Major component.
    #[must_use]
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Build component.
    #[must_use]
    pub fn build(&self) -> u32 {
        self.build
    }

    /// Pre-release or tag label, empty when absent.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the version carries a label.
    #[must_use]
    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if self.is_labeled() {
            write!(f, "-{}", self.label)?;
        }
        Ok(())
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.build)
            .cmp(&(other.major, other.minor, other.build))
            .then_with(|| match (self.is_labeled(), other.is_labeled()) {
                // A labeled build precedes the release with the same numbers
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => self.label.cmp(&other.label),
            })
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The string is not a package version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a package version")]
pub struct ParseVersionError(String);

impl FromStr for PackageVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseVersionError(s.to_string()))
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
