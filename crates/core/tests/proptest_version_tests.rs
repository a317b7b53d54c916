//! Property-based tests for the package version grammar.
//!
//! - Dotted ids, labels and the package extension never change the parsed
//!   numbers or label
//! - Strings missing a numeric group never parse
//! - Rendering an unlabeled version and parsing it again is lossless

use proptest::prelude::*;
use toolfeed_core::PackageVersion;

// =============================================================================
// Strategies
// =============================================================================

/// Dotted package ids made of letters, e.g. `TeamCity.Dotnet.Integration`
fn package_id_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z]{1,10}", 1..4).prop_map(|parts| parts.join("."))
}

fn label_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,12}".prop_map(String::from)
}

fn component_strategy() -> impl Strategy<Value = u32> {
    0..100_000u32
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn full_file_names_parse_exactly(
        id in package_id_strategy(),
        major in component_strategy(),
        minor in component_strategy(),
        build in component_strategy(),
        label in label_strategy(),
    ) {
        let raw = format!("{id}.{major}.{minor}.{build}-{label}.nupkg");
        let version = PackageVersion::parse(&raw).unwrap();

        prop_assert_eq!(version.major(), major);
        prop_assert_eq!(version.minor(), minor);
        prop_assert_eq!(version.build(), build);
        prop_assert_eq!(version.label(), label.as_str());
    }

    #[test]
    fn missing_numeric_group_never_parses(
        id in package_id_strategy(),
        major in component_strategy(),
        minor in component_strategy(),
        label in proptest::option::of(label_strategy()),
    ) {
        let suffix = label.map(|l| format!("-{l}")).unwrap_or_default();
        let no_build = format!("{major}.{minor}{suffix}");
        let no_build_nupkg = format!("{id}.{major}.{minor}{suffix}.nupkg");
        let no_minor = format!("{id}.{major}{suffix}");
        prop_assert!(PackageVersion::parse(&no_build).is_none());
        prop_assert!(PackageVersion::parse(&no_build_nupkg).is_none());
        prop_assert!(PackageVersion::parse(&no_minor).is_none());
    }

    #[test]
    fn unlabeled_render_round_trips(
        major in component_strategy(),
        minor in component_strategy(),
        build in component_strategy(),
    ) {
        let version = PackageVersion::parse(&format!("{major}.{minor}.{build}")).unwrap();
        let reparsed = PackageVersion::parse(&version.to_string()).unwrap();
        prop_assert_eq!(reparsed, version);
    }

    #[test]
    fn arbitrary_input_never_panics(raw in ".{0,40}") {
        let _ = PackageVersion::parse(&raw);
    }
}
