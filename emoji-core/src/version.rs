//! Platform version gating.
//!
//! Versions are dotted numeric strings ("17", "17.4", "18.4.1"). Missing
//! trailing segments count as zero, so "17" and "17.0" are equal.

use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVersion {
    segments: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed version string: {0:?}")]
pub struct MalformedVersion(pub String);

impl FromStr for PlatformVersion {
    type Err = MalformedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MalformedVersion(s.to_string()));
        }
        let segments = trimmed
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(MalformedVersion(s.to_string()));
                }
                segment.parse::<u64>().map_err(|_| MalformedVersion(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| {
                let a = self.segments.get(i).copied().unwrap_or(0);
                let b = other.segments.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Whether an emoji requiring `required` can be shown on `current`.
///
/// Only a well-formed `required` strictly greater than a well-formed `current`
/// is unsupported; anything unparseable is assumed supported.
pub fn is_supported(required: &str, current: &str) -> bool {
    match (required.parse::<PlatformVersion>(), current.parse::<PlatformVersion>()) {
        (Ok(required), Ok(current)) => required <= current,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_segment_comparison() {
        // Numeric, not lexicographic: 9 < 10
        assert!(is_supported("9.1", "10.0"));
        assert!(!is_supported("18.4", "18.2"));
        assert!(is_supported("18.4", "18.4"));
        assert!(is_supported("16.4", "17"));
    }

    #[test]
    fn test_missing_segments_are_zero() {
        assert!(is_supported("17.0", "17"));
        assert!(is_supported("17", "17.0.0"));
        assert!(!is_supported("17.0.1", "17"));
    }

    #[test]
    fn test_malformed_versions_are_supported() {
        assert!(is_supported("", "17.0"));
        assert!(is_supported("18.x", "17.0"));
        assert!(is_supported("99.0", "beta"));
        assert!(is_supported("1..2", "1.0"));
    }

    #[test]
    fn test_parse() {
        let v: PlatformVersion = " 18.4.1 ".parse().unwrap();
        assert_eq!(v.segments, vec![18, 4, 1]);
        assert!("18.-1".parse::<PlatformVersion>().is_err());
    }
}
