//! Compatibility checks between versions, ranges and the host application.

use std::cmp::Ordering;

use crate::version::{UpperBound, Version, VersionRange, compare};

/// Whether `version` is acceptable under `range`.
pub fn satisfies(version: &Version, range: &VersionRange) -> bool {
    range.contains(version)
}

/// Whether the host meets an add-on's minimum host version.
pub fn is_host_compatible(host: &Version, min_required: &Version) -> bool {
    compare(host, min_required) != Ordering::Less
}

/// The host window `[min, max)` an add-on declares.
///
/// A window whose maximum does not exceed its minimum admits nothing;
/// manifest validation rejects such declarations before they get here.
pub fn host_window(min: &Version, max: Option<&Version>) -> VersionRange {
    VersionRange {
        lower: min.clone(),
        upper: max.map(|version| UpperBound {
            version: version.clone(),
            inclusive: false,
        }),
    }
}

/// Whether the host falls inside `[min, max)`.
pub fn host_window_admits(host: &Version, min: &Version, max: Option<&Version>) -> bool {
    is_host_compatible(host, min) && max.is_none_or(|max| host < max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_host_equal_to_minimum_is_compatible() {
        assert!(is_host_compatible(&v("2.11.0"), &v("2.11.0")));
    }

    #[test]
    fn test_older_host_is_incompatible() {
        assert!(!is_host_compatible(&v("2.10.1"), &v("2.11.0")));
    }

    #[test]
    fn test_prerelease_host_is_below_its_release() {
        assert!(!is_host_compatible(&v("2.11.0-beta"), &v("2.11.0")));
        assert!(is_host_compatible(&v("2.12.0-beta"), &v("2.11.0")));
    }

    #[test]
    fn test_host_window_excludes_maximum() {
        let min = v("2.0.0");
        let max = v("3.0.0");
        assert!(host_window_admits(&v("2.99.0"), &min, Some(&max)));
        assert!(!host_window_admits(&v("3.0.0"), &min, Some(&max)));
        assert!(host_window_admits(&v("9.0.0"), &min, None));
    }

    #[test]
    fn test_host_window_agrees_with_range() {
        let min = v("2.0.0");
        let max = v("3.0.0");
        let window = host_window(&min, Some(&max));
        assert_eq!(window.to_string(), ">=2.0.0, <3.0.0");
        for host in ["1.9.0", "2.0.0", "2.5.0", "3.0.0", "3.0.0-rc"] {
            let host = v(host);
            assert_eq!(
                satisfies(&host, &window),
                host_window_admits(&host, &min, Some(&max)),
                "host {host}"
            );
        }
    }
}
