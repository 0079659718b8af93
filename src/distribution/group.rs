//! Group derivation and the total order inside a group
//!
//! A group is the set of distributions sharing `major.minor` and flavor.
//! Ordering is only defined between members of the same group: patch number
//! first, flavor version as the tiebreak.

use std::cmp::Ordering;

use crate::distribution::error::DistributionError;
use crate::distribution::id::DistributionId;

/// Components of a `major.minor.patch` version string.
///
/// `major` and `minor` keep their original text since group keys compare
/// textually ("01.7" and "1.7" are different groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionParts<'a> {
    pub major: &'a str,
    pub minor: &'a str,
    pub patch: u64,
}

impl VersionParts<'_> {
    pub fn major_minor(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

/// Split a version into exactly three numeric components.
///
/// Returns None for anything else: missing or extra components, empty
/// components, signs, whitespace or values that overflow `u64`.
pub fn split_version(version: &str) -> Option<VersionParts<'_>> {
    let mut parts = version.split('.');
    let (major, minor, patch) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    parse_component(major)?;
    parse_component(minor)?;
    let patch = parse_component(patch)?;

    Some(VersionParts {
        major,
        minor,
        patch,
    })
}

fn parse_component(component: &str) -> Option<u64> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    component.parse().ok()
}

pub fn group_key(parts: &VersionParts<'_>, flavor: &str) -> String {
    format!("{}-{}", parts.major_minor(), flavor)
}

/// Order two distributions of the same group.
///
/// Distributions from different groups are never ordered; the caller gets
/// `IncomparableGroups` instead of a guess.
pub fn compare_in_group(
    left: &DistributionId,
    right: &DistributionId,
) -> Result<Ordering, DistributionError> {
    let left_group = left.group()?;
    let right_group = right.group()?;
    if left_group != right_group {
        return Err(DistributionError::IncomparableGroups {
            left: left.to_string(),
            right: right.to_string(),
        });
    }

    Ok(left
        .patch()?
        .cmp(&right.patch()?)
        .then(left.flavor_version.cmp(&right.flavor_version)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.7.30", Some(("1", "7", 30)))]
    #[case("01.2.3", Some(("01", "2", 3)))]
    #[case("0.0.0", Some(("0", "0", 0)))]
    #[case("1.7", None)]
    #[case("1.7.3.4", None)]
    #[case("1..3", None)]
    #[case("1.7.x", None)]
    #[case("1.7.-3", None)]
    #[case("1.7.+3", None)]
    #[case(" 1.7.3", None)]
    #[case("1.7.3 ", None)]
    #[case("1.7.99999999999999999999", None)]
    #[case("", None)]
    fn split_version_accepts_only_three_numeric_components(
        #[case] version: &str,
        #[case] expected: Option<(&str, &str, u64)>,
    ) {
        let actual = split_version(version).map(|p| (p.major, p.minor, p.patch));
        assert_eq!(actual, expected);
    }

    #[test]
    fn group_key_joins_major_minor_and_flavor() {
        let parts = split_version("1.8.3").unwrap();
        assert_eq!(group_key(&parts, "tetratefips"), "1.8-tetratefips");
        assert_eq!(group_key(&parts, ""), "1.8-");
    }

    #[rstest]
    #[case("1.7.30-tetrate-v40", "1.7.30-tetrate-v39", Ordering::Greater)]
    #[case("1.7.20-tetrate-v40", "1.7.30-tetrate-v40", Ordering::Less)]
    #[case("1.7.9-tetrate-v0", "1.7.30-tetrate-v0", Ordering::Less)]
    #[case("1.7.3-tetrate-v1", "1.7.3-tetrate-v1", Ordering::Equal)]
    #[case("1.7.4-tetrate-v0", "1.7.3-tetrate-v9", Ordering::Greater)]
    fn compare_in_group_orders_by_patch_then_flavor_version(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Ordering,
    ) {
        let left: DistributionId = left.parse().unwrap();
        let right: DistributionId = right.parse().unwrap();
        assert_eq!(compare_in_group(&left, &right).unwrap(), expected);
    }

    #[rstest]
    #[case("1.7.3-tetrate-v0", "1.8.3-tetrate-v0")]
    #[case("1.7.3-tetrate-v0", "1.7.3-tetratefips-v0")]
    #[case("1.7.3-tetrate-v0", "01.7.3-tetrate-v0")]
    fn compare_in_group_rejects_different_groups(#[case] left: &str, #[case] right: &str) {
        let left: DistributionId = left.parse().unwrap();
        let right: DistributionId = right.parse().unwrap();
        assert!(matches!(
            compare_in_group(&left, &right),
            Err(DistributionError::IncomparableGroups { .. })
        ));
    }
}
