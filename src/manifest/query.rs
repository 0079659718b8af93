//! Latest-in-group lookups against a catalog

use crate::distribution::{DistributionError, DistributionId};
use crate::manifest::types::{Catalog, CatalogEntry};

/// Result of [`find_latest_in_group`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestInGroup<'a> {
    /// Newest entry sharing the reference's group, None if the group is unknown
    pub latest: Option<&'a CatalogEntry>,
    /// Some entry strictly newer than the reference is a security patch
    pub includes_security_patch: bool,
}

impl LatestInGroup<'_> {
    pub fn latest_id(&self) -> Option<&DistributionId> {
        self.latest.map(|entry| &entry.id)
    }
}

/// Find the newest catalog entry in the reference's group.
///
/// `includes_security_patch` is set when any entry newer than the reference is
/// flagged, even if that entry is itself superseded by a later non-security
/// one. An unknown group is not an error: `latest` is None.
pub fn find_latest_in_group<'a>(
    reference: &DistributionId,
    catalog: &'a Catalog,
) -> Result<LatestInGroup<'a>, DistributionError> {
    let reference_group = reference.group()?;

    let mut latest: Option<&CatalogEntry> = None;
    let mut includes_security_patch = false;

    for entry in &catalog.entries {
        if entry.id.group()? != reference_group {
            continue;
        }

        if entry.is_security_patch && entry.id.greater_than(reference)? {
            includes_security_patch = true;
        }

        latest = match latest {
            Some(current) if !entry.id.greater_than(&current.id)? => Some(current),
            _ => Some(entry),
        };
    }

    Ok(LatestInGroup {
        latest,
        includes_security_patch,
    })
}
