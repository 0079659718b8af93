//! Choosing and downloading a distribution from the catalog

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_FLAVOR, HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::distribution::DistributionId;
use crate::manifest::{Catalog, CatalogEntry};
use crate::store::StoreError;

/// Partial selection from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub version: Option<String>,
    pub flavor: Option<String>,
    pub flavor_version: Option<i64>,
}

impl FetchRequest {
    fn matches(&self, id: &DistributionId) -> bool {
        let flavor = self.flavor.as_deref().unwrap_or(DEFAULT_FLAVOR);
        id.flavor == flavor
            && self.version.as_ref().is_none_or(|v| *v == id.version)
            && self.flavor_version.is_none_or(|fv| fv == id.flavor_version)
    }

    fn describe(&self) -> String {
        format!(
            "version={} flavor={} flavor_version={}",
            self.version.as_deref().unwrap_or("*"),
            self.flavor.as_deref().unwrap_or(DEFAULT_FLAVOR),
            self.flavor_version
                .map(|fv| fv.to_string())
                .unwrap_or_else(|| "*".to_string())
        )
    }
}

/// Pick the catalog entry to fetch.
///
/// When every match falls in one group the newest of that group wins,
/// otherwise the first match in manifest order (the manifest is newest first).
pub fn resolve_fetch_target<'a>(
    catalog: &'a Catalog,
    request: &FetchRequest,
) -> Result<&'a CatalogEntry, StoreError> {
    let matches: Vec<&CatalogEntry> = catalog
        .entries
        .iter()
        .filter(|entry| request.matches(&entry.id))
        .collect();

    let Some(first) = matches.first().copied() else {
        return Err(StoreError::NotInCatalog(request.describe()));
    };

    let first_group = first.id.group()?;
    let mut single_group = true;
    for entry in &matches[1..] {
        if entry.id.group()? != first_group {
            single_group = false;
            break;
        }
    }
    if !single_group {
        debug!("Matches span several groups, taking {} from manifest order", first.id);
        return Ok(first);
    }

    let mut latest = first;
    for entry in &matches[1..] {
        if entry.id.greater_than(&latest.id)? {
            latest = *entry;
        }
    }
    Ok(latest)
}

/// Platform suffix used in archive names, None on unsupported targets
pub fn current_platform() -> Option<&'static str> {
    platform_for(std::env::consts::OS, std::env::consts::ARCH)
}

fn platform_for(os: &str, arch: &str) -> Option<&'static str> {
    match (os, arch) {
        ("linux", "x86_64") => Some("linux-amd64"),
        ("linux", "aarch64") => Some("linux-arm64"),
        ("macos", "x86_64") => Some("osx"),
        ("macos", "aarch64") => Some("osx-arm64"),
        _ => None,
    }
}

pub fn archive_url(base_url: &str, id: &DistributionId, platform: &str) -> String {
    format!(
        "{}/istio-{}-{}.tar.gz",
        base_url.trim_end_matches('/'),
        id,
        platform
    )
}

/// HTTP download of distribution archives
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        info!("Downloading {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::Download {
                url: url.to_string(),
                reason: "archive not published for this platform".to_string(),
            });
        }

        if !status.is_success() {
            warn!("Download server returned status {}: {}", status, url);
            return Err(StoreError::Download {
                url: url.to_string(),
                reason: format!("Unexpected status: {}", status),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
