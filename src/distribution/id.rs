//! Distribution identifier: parsing, canonical rendering and comparison

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distribution::error::DistributionError;
use crate::distribution::group::{compare_in_group, group_key, split_version};

/// One distribution variant: upstream version, vendor flavor and flavor revision.
///
/// The canonical string form is `{version}-{flavor}-v{flavor_version}`. A bare
/// `x.y.z` is accepted by [`DistributionId::parse`] and yields an empty flavor
/// with revision 0, but rendering always uses the three-part form, so such a
/// value renders as `x.y.z--v0`. That string parses back to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistributionId {
    pub version: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub flavor_version: i64,
}

impl DistributionId {
    pub fn new(version: impl Into<String>, flavor: impl Into<String>, flavor_version: i64) -> Self {
        Self {
            version: version.into(),
            flavor: flavor.into(),
            flavor_version,
        }
    }

    /// Parse either `x.y.z` or `x.y.z-{flavor}-v{n}`.
    ///
    /// The input is split on the first `-` into version and remainder, and the
    /// remainder on its first `-` into flavor and revision.
    pub fn parse(input: &str) -> Result<Self, DistributionError> {
        let Some((version, rest)) = input.split_once('-') else {
            validate_version(input, input)?;
            return Ok(Self::new(input, "", 0));
        };

        validate_version(version, input)?;

        let Some((flavor, revision)) = rest.split_once('-') else {
            return Err(DistributionError::MalformedFlavor {
                segment: rest.to_string(),
                input: input.to_string(),
                reason: "expected {flavor}-v{revision}",
            });
        };

        let Some(digits) = revision.strip_prefix('v') else {
            return Err(DistributionError::MalformedFlavor {
                segment: revision.to_string(),
                input: input.to_string(),
                reason: "flavor revision must start with 'v'",
            });
        };

        let flavor_version = Some(digits)
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|d| d.parse::<i64>().ok())
            .ok_or_else(|| DistributionError::MalformedFlavor {
                segment: revision.to_string(),
                input: input.to_string(),
                reason: "flavor revision must be a non-negative 64-bit integer",
            })?;

        Ok(Self::new(version, flavor, flavor_version))
    }

    /// True for the unmodified upstream build (empty flavor).
    pub fn is_upstream(&self) -> bool {
        self.flavor.is_empty()
    }

    pub fn patch(&self) -> Result<u64, DistributionError> {
        split_version(&self.version)
            .map(|parts| parts.patch)
            .ok_or_else(|| self.malformed_version())
    }

    /// Group key `{major}.{minor}-{flavor}`.
    pub fn group(&self) -> Result<String, DistributionError> {
        split_version(&self.version)
            .map(|parts| group_key(&parts, &self.flavor))
            .ok_or_else(|| self.malformed_version())
    }

    /// `{major}.{minor}`, the key used for end-of-life dates.
    pub fn minor_version(&self) -> Result<String, DistributionError> {
        split_version(&self.version)
            .map(|parts| parts.major_minor())
            .ok_or_else(|| self.malformed_version())
    }

    /// Strictly newer than `other` within the same group.
    pub fn greater_than(&self, other: &DistributionId) -> Result<bool, DistributionError> {
        Ok(compare_in_group(self, other)?.is_gt())
    }

    fn malformed_version(&self) -> DistributionError {
        DistributionError::MalformedVersion {
            segment: self.version.clone(),
            input: self.to_string(),
        }
    }
}

fn validate_version(segment: &str, input: &str) -> Result<(), DistributionError> {
    match split_version(segment) {
        Some(_) => Ok(()),
        None => Err(DistributionError::MalformedVersion {
            segment: segment.to_string(),
            input: input.to_string(),
        }),
    }
}

impl fmt::Display for DistributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-v{}", self.version, self.flavor, self.flavor_version)
    }
}

impl FromStr for DistributionId {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
