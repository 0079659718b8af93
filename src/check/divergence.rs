//! Reduce live mesh versions to one representative per group and advise

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::check::error::CheckError;
use crate::distribution::DistributionId;
use crate::manifest::{Catalog, find_latest_in_group};

/// Lowest observed distribution per group key, ordered by key
pub type GroupMap = BTreeMap<String, DistributionId>;

/// Whether a check found anything the user should act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    IssuesFound,
}

impl Outcome {
    pub fn is_clean(self) -> bool {
        self == Outcome::Clean
    }

    /// IssuesFound if either side found issues
    pub fn combine(self, other: Outcome) -> Outcome {
        if self.is_clean() && other.is_clean() {
            Outcome::Clean
        } else {
            Outcome::IssuesFound
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub messages: Vec<String>,
    pub outcome: Outcome,
}

/// Parse live version strings and keep the lowest distribution per group.
///
/// Upstream (unflavored) versions are skipped with a warning since they are
/// not tracked for patch advisories. Any other parse failure aborts the call.
pub fn collect_lowest_per_group<S: AsRef<str>>(
    raw_versions: &[S],
) -> Result<GroupMap, CheckError> {
    let mut groups = GroupMap::new();

    for raw in raw_versions {
        let raw = raw.as_ref();
        let id = DistributionId::parse(raw)?;
        if id.is_upstream() {
            warn!("Skipping upstream version {}: only flavored distributions are tracked", raw);
            continue;
        }

        let group = id.group()?;
        match groups.get(&group) {
            Some(current) if !current.greater_than(&id)? => {}
            _ => {
                groups.insert(group, id);
            }
        }
    }

    Ok(groups)
}

/// Build the advisory for a mesh from its data plane and control plane groups.
///
/// The outcome is `Clean` only when every merged group is already on the
/// latest catalog entry of its group.
pub fn build_advisory(
    data_plane: &GroupMap,
    control_plane: &GroupMap,
    catalog: &Catalog,
) -> Result<Advisory, CheckError> {
    let mut messages = Vec::new();

    for (plane, groups) in [("data plane", data_plane), ("control plane", control_plane)] {
        if groups.len() > 1 {
            let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
            messages.push(format!(
                "your {} is running in multiple minor versions: {}",
                plane,
                keys.join(", ")
            ));
        }
    }

    if let (Some(data_group), Some(control_group)) =
        (single_key(data_plane), single_key(control_plane))
        && data_group != control_group
    {
        messages.push(format!(
            "the minor versions of control plane and data plane mismatch: data plane {} vs control plane {}",
            data_group, control_group
        ));
    }

    let merged = merge_lowest(data_plane, control_plane)?;

    let mut all_latest = true;
    for (group, current) in &merged {
        let result = find_latest_in_group(current, catalog)?;
        debug!("Group {} current {} latest {:?}", group, current, result.latest_id());

        match result.latest_id() {
            None => {
                all_latest = false;
                messages.push(format!(
                    "{} is no longer supported. Please refer to the latest catalog via `getmesh list`",
                    group
                ));
            }
            Some(latest) if latest == current => {
                messages.push(format!("{} is the latest version in {}", current, group));
            }
            Some(latest) if result.includes_security_patch => {
                all_latest = false;
                messages.push(format!(
                    "there is an available patch for the minor version {} which includes **security upgrades**. \
                     We strongly recommend upgrading all {} versions -> {}",
                    group, group, latest
                ));
            }
            Some(latest) => {
                all_latest = false;
                messages.push(format!(
                    "there is an available patch for the minor version {}. \
                     We recommend upgrading all {} versions -> {}",
                    group, group, latest
                ));
            }
        }
    }

    let outcome = if all_latest {
        Outcome::Clean
    } else {
        Outcome::IssuesFound
    };

    Ok(Advisory { messages, outcome })
}

/// Merge both planes, keeping the lower distribution when a group appears in both
pub fn merge_lowest(
    data_plane: &GroupMap,
    control_plane: &GroupMap,
) -> Result<GroupMap, CheckError> {
    let mut merged = data_plane.clone();
    for (group, id) in control_plane {
        match merged.get(group) {
            Some(current) if !current.greater_than(id)? => {}
            _ => {
                merged.insert(group.clone(), id.clone());
            }
        }
    }
    Ok(merged)
}

/// Notices for groups whose minor version reached end of life on or before `today`
pub fn eol_notices(
    groups: &GroupMap,
    catalog: &Catalog,
    today: NaiveDate,
) -> Result<Vec<String>, CheckError> {
    let mut notices = Vec::new();
    let mut seen = Vec::new();

    for id in groups.values() {
        let minor = id.minor_version()?;
        if seen.contains(&minor) {
            continue;
        }
        if let Some(eol) = catalog.minor_eol(&minor)
            && eol <= today
        {
            notices.push(format!(
                "{} reached end of life on {}; upgrade to a supported minor version",
                minor,
                eol.format("%Y-%m-%d")
            ));
        }
        seen.push(minor);
    }

    Ok(notices)
}

fn single_key(groups: &GroupMap) -> Option<&str> {
    match groups.len() {
        1 => groups.keys().next().map(String::as_str),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::CatalogEntry;
    use indexmap::IndexMap;

    fn entry(id: &str, is_security_patch: bool) -> CatalogEntry {
        CatalogEntry {
            id: id.parse().unwrap(),
            supported_platform_versions: vec![],
            is_security_patch,
            release_notes: vec![],
            end_of_life: None,
        }
    }

    fn catalog(entries: Vec<CatalogEntry>) -> Catalog {
        Catalog {
            entries,
            minor_eol_dates: IndexMap::new(),
        }
    }

    fn groups(ids: &[&str]) -> GroupMap {
        collect_lowest_per_group(ids).unwrap()
    }

    #[test]
    fn collect_keeps_lowest_per_group() {
        let result = groups(&[
            "1.7.6-tetrate-v0",
            "1.7.4-tetrate-v1",
            "1.7.4-tetrate-v0",
            "1.8.1-tetrate-v0",
            "1.7.5-tetrate-v0",
        ]);

        assert_eq!(result.len(), 2);
        assert_eq!(result["1.7-tetrate"].to_string(), "1.7.4-tetrate-v0");
        assert_eq!(result["1.8-tetrate"].to_string(), "1.8.1-tetrate-v0");
    }

    #[test]
    fn collect_skips_upstream_versions() {
        let result = groups(&["1.8.3", "1.8.3-tetrate-v0"]);

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["1.8-tetrate"]);
    }

    #[test]
    fn collect_fails_on_malformed_version() {
        let result = collect_lowest_per_group(&["1.8.3-tetrate-v0", "1.8-tetrate"]);
        assert!(matches!(result, Err(CheckError::Distribution(_))));
    }

    #[test]
    fn collect_of_nothing_is_empty() {
        let empty: [&str; 0] = [];
        assert!(collect_lowest_per_group(&empty).unwrap().is_empty());
    }

    #[test]
    fn advisory_is_clean_when_all_groups_latest() {
        let catalog = catalog(vec![entry("1.8.3-tetrate-v0", false)]);
        let data = groups(&["1.8.3-tetrate-v0"]);
        let control = groups(&["1.8.3-tetrate-v0"]);

        let advisory = build_advisory(&data, &control, &catalog).unwrap();

        assert_eq!(advisory.outcome, Outcome::Clean);
        assert_eq!(
            advisory.messages,
            vec!["1.8.3-tetrate-v0 is the latest version in 1.8-tetrate"]
        );
    }

    #[test]
    fn advisory_recommends_available_patch() {
        let catalog = catalog(vec![
            entry("1.8.5-tetrate-v0", false),
            entry("1.8.3-tetrate-v0", false),
        ]);
        let data = groups(&["1.8.3-tetrate-v0"]);
        let control = groups(&["1.8.5-tetrate-v0"]);

        let advisory = build_advisory(&data, &control, &catalog).unwrap();

        assert_eq!(advisory.outcome, Outcome::IssuesFound);
        assert_eq!(advisory.messages.len(), 1);
        assert!(
            advisory.messages[0]
                .contains("We recommend upgrading all 1.8-tetrate versions -> 1.8.5-tetrate-v0")
        );
        assert!(!advisory.messages[0].contains("security"));
    }

    #[test]
    fn advisory_escalates_security_patch() {
        let catalog = catalog(vec![
            entry("1.8.5-tetrate-v0", false),
            entry("1.8.4-tetrate-v0", true),
        ]);
        let data = groups(&["1.8.3-tetrate-v0"]);

        let advisory = build_advisory(&data, &GroupMap::new(), &catalog).unwrap();

        assert_eq!(advisory.outcome, Outcome::IssuesFound);
        assert!(advisory.messages[0].contains("**security upgrades**"));
        assert!(
            advisory.messages[0]
                .contains("We strongly recommend upgrading all 1.8-tetrate versions -> 1.8.5-tetrate-v0")
        );
    }

    #[test]
    fn advisory_flags_unsupported_group() {
        let catalog = catalog(vec![entry("1.8.5-tetrate-v0", false)]);
        let data = groups(&["1.6.14-tetrate-v0"]);

        let advisory = build_advisory(&data, &GroupMap::new(), &catalog).unwrap();

        assert_eq!(advisory.outcome, Outcome::IssuesFound);
        assert_eq!(
            advisory.messages,
            vec!["1.6-tetrate is no longer supported. Please refer to the latest catalog via `getmesh list`"]
        );
    }

    #[test]
    fn advisory_reports_multiple_minor_versions_sorted() {
        let catalog = catalog(vec![
            entry("1.8.5-tetrate-v0", false),
            entry("1.7.8-tetrate-v0", false),
        ]);
        let data = groups(&["1.8.5-tetrate-v0", "1.7.8-tetrate-v0"]);
        let control = groups(&["1.8.5-tetrate-v0", "1.7.8-tetrate-v0"]);

        let advisory = build_advisory(&data, &control, &catalog).unwrap();

        assert_eq!(
            advisory.messages,
            vec![
                "your data plane is running in multiple minor versions: 1.7-tetrate, 1.8-tetrate",
                "your control plane is running in multiple minor versions: 1.7-tetrate, 1.8-tetrate",
                "1.7.8-tetrate-v0 is the latest version in 1.7-tetrate",
                "1.8.5-tetrate-v0 is the latest version in 1.8-tetrate",
            ]
        );
        assert_eq!(advisory.outcome, Outcome::Clean);
    }

    #[test]
    fn advisory_reports_plane_mismatch() {
        let catalog = catalog(vec![
            entry("1.8.5-tetrate-v0", false),
            entry("1.7.8-tetrate-v0", false),
        ]);
        let data = groups(&["1.7.8-tetrate-v0"]);
        let control = groups(&["1.8.5-tetrate-v0"]);

        let advisory = build_advisory(&data, &control, &catalog).unwrap();

        assert_eq!(
            advisory.messages[0],
            "the minor versions of control plane and data plane mismatch: data plane 1.7-tetrate vs control plane 1.8-tetrate"
        );
        assert_eq!(advisory.messages.len(), 3);
    }

    #[test]
    fn advisory_of_empty_mesh_is_clean() {
        let advisory =
            build_advisory(&GroupMap::new(), &GroupMap::new(), &Catalog::default()).unwrap();

        assert!(advisory.messages.is_empty());
        assert_eq!(advisory.outcome, Outcome::Clean);
    }

    #[test]
    fn advisory_aborts_on_malformed_catalog_entry() {
        let mut broken = entry("1.8.5-tetrate-v0", false);
        broken.id.version = "1.8".to_string();
        let catalog = catalog(vec![broken]);
        let data = groups(&["1.8.3-tetrate-v0"]);

        assert!(build_advisory(&data, &GroupMap::new(), &catalog).is_err());
    }

    #[test]
    fn merge_takes_lower_of_both_planes() {
        let data = groups(&["1.8.5-tetrate-v0", "1.7.2-tetrate-v0"]);
        let control = groups(&["1.8.3-tetrate-v0", "1.9.0-tetrate-v0"]);

        let merged = merge_lowest(&data, &control).unwrap();

        assert_eq!(merged["1.7-tetrate"].to_string(), "1.7.2-tetrate-v0");
        assert_eq!(merged["1.8-tetrate"].to_string(), "1.8.3-tetrate-v0");
        assert_eq!(merged["1.9-tetrate"].to_string(), "1.9.0-tetrate-v0");
    }

    #[test]
    fn eol_notices_for_expired_minors_only() {
        let mut catalog = Catalog::default();
        catalog
            .minor_eol_dates
            .insert("1.7".to_string(), NaiveDate::from_ymd_opt(2021, 5, 21).unwrap());
        catalog
            .minor_eol_dates
            .insert("1.8".to_string(), NaiveDate::from_ymd_opt(2021, 8, 21).unwrap());
        let groups = groups(&["1.7.8-tetrate-v0", "1.7.8-tetratefips-v0", "1.8.5-tetrate-v0"]);

        let notices =
            eol_notices(&groups, &catalog, NaiveDate::from_ymd_opt(2021, 5, 21).unwrap()).unwrap();

        assert_eq!(
            notices,
            vec!["1.7 reached end of life on 2021-05-21; upgrade to a supported minor version"]
        );
    }

    #[test]
    fn outcome_combine() {
        assert_eq!(Outcome::Clean.combine(Outcome::Clean), Outcome::Clean);
        assert_eq!(Outcome::Clean.combine(Outcome::IssuesFound), Outcome::IssuesFound);
        assert_eq!(Outcome::IssuesFound.combine(Outcome::Clean), Outcome::IssuesFound);
    }
}
