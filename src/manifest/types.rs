//! Catalog records as published in the remote manifest

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::distribution::DistributionId;
use crate::manifest::error::ManifestError;

/// Strict `YYYY-MM-DD`; chrono alone would accept `2021-1-5`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One published distribution with its metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub id: DistributionId,
    #[serde(rename = "k8s_versions", default)]
    pub supported_platform_versions: Vec<String>,
    #[serde(default)]
    pub is_security_patch: bool,
    #[serde(default)]
    pub release_notes: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_of_life: Option<NaiveDate>,
}

/// The full manifest: distributions (newest first) and per-minor EOL dates
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(rename = "istio_distributions", default)]
    pub entries: Vec<CatalogEntry>,
    #[serde(
        rename = "istio_minor_versions_eol_dates",
        default,
        deserialize_with = "deserialize_date_map"
    )]
    pub minor_eol_dates: IndexMap<String, NaiveDate>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// End-of-life date for a `{major}.{minor}` key
    pub fn minor_eol(&self, major_minor: &str) -> Option<NaiveDate> {
        self.minor_eol_dates.get(major_minor).copied()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(format!("invalid date {value:?}: expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("invalid date {value:?}: {e}"))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some).map_err(serde::de::Error::custom),
    }
}

fn deserialize_date_map<'de, D>(deserializer: D) -> Result<IndexMap<String, NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: IndexMap<String, String> = IndexMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(minor, date)| {
            parse_date(&date)
                .map(|date| (minor, date))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
