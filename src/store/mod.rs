//! Locally installed distributions
//!
//! Layout: `<home>/istio/<canonical distribution>/bin/istioctl`. Directory
//! names use the canonical `{version}-{flavor}-v{n}` form.

pub mod archive;
pub mod error;
pub mod fetch;

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::distribution::DistributionId;
use crate::manifest::{Catalog, find_latest_in_group};

pub use error::StoreError;

const ISTIO_DIR: &str = "istio";
const BINARY_NAME: &str = "istioctl";

/// Installed distributions under a getmesh home directory
pub struct Store {
    root: PathBuf,
}

/// How an installed distribution relates to the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    Latest,
    Outdated {
        latest: DistributionId,
        security: bool,
    },
    /// Group not present in the catalog any more
    Unsupported,
    /// Upstream builds are not tracked
    Untracked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledStatus {
    pub id: DistributionId,
    pub status: InstallStatus,
}

impl Store {
    pub fn new(home: &Path) -> Self {
        Self {
            root: home.join(ISTIO_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn distribution_dir(&self, id: &DistributionId) -> PathBuf {
        self.root.join(id.to_string())
    }

    pub fn istioctl_path(&self, id: &DistributionId) -> PathBuf {
        self.distribution_dir(id).join("bin").join(BINARY_NAME)
    }

    pub fn is_installed(&self, id: &DistributionId) -> bool {
        self.istioctl_path(id).is_file()
    }

    /// Installed distributions, sorted by canonical name.
    ///
    /// Directories whose names do not parse are skipped with a warning.
    pub fn installed(&self) -> Result<Vec<DistributionId>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store {:?} does not exist yet", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut installed = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                warn!("Skipping non UTF-8 entry {:?} in {:?}", name, self.root);
                continue;
            };

            match DistributionId::parse(name) {
                Ok(id) if self.is_installed(&id) => installed.push(id),
                Ok(id) => warn!("Skipping {}: {} missing", id, BINARY_NAME),
                Err(e) => warn!("Skipping {:?} in {:?}: {}", name, self.root, e),
            }
        }

        installed.sort_by_key(|id| id.to_string());
        Ok(installed)
    }

    pub fn remove(&self, id: &DistributionId) -> Result<(), StoreError> {
        if !self.is_installed(id) {
            return Err(StoreError::NotInstalled(id.to_string()));
        }

        let dir = self.distribution_dir(id);
        std::fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        info!("Removed {}", id);
        Ok(())
    }
}

/// Compare each installed distribution with the newest catalog entry of its group
pub fn installed_status(
    installed: &[DistributionId],
    catalog: &Catalog,
) -> Result<Vec<InstalledStatus>, StoreError> {
    installed
        .iter()
        .map(|id| -> Result<InstalledStatus, StoreError> {
            let status = if id.is_upstream() {
                InstallStatus::Untracked
            } else {
                let result = find_latest_in_group(id, catalog)?;
                match result.latest_id() {
                    None => InstallStatus::Unsupported,
                    Some(latest) if latest.greater_than(id)? => InstallStatus::Outdated {
                        latest: latest.clone(),
                        security: result.includes_security_patch,
                    },
                    Some(_) => InstallStatus::Latest,
                }
            };
            Ok(InstalledStatus {
                id: id.clone(),
                status,
            })
        })
        .collect()
}
