//! Unpack a downloaded `.tar.gz` distribution into the store

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::distribution::DistributionId;
use crate::store::{BINARY_NAME, Store, StoreError};

impl Store {
    /// Extract `archive` and install its `bin/istioctl` for `id`.
    ///
    /// Extraction happens in a temporary directory inside the store so the
    /// final move is a rename on the same filesystem. An existing install of
    /// `id` is replaced.
    pub fn install_from_archive<R: Read>(
        &self,
        id: &DistributionId,
        archive: R,
    ) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(self.root()).map_err(|e| StoreError::io(self.root(), e))?;

        let staging =
            tempfile::TempDir::new_in(self.root()).map_err(|e| StoreError::io(self.root(), e))?;
        tar::Archive::new(GzDecoder::new(archive))
            .unpack(staging.path())
            .map_err(|e| StoreError::Archive(e.to_string()))?;
        debug!("Unpacked archive for {} into {:?}", id, staging.path());

        let binary = find_binary(staging.path())
            .map_err(|e| StoreError::io(staging.path(), e))?
            .ok_or_else(|| {
                StoreError::Archive(format!("bin/{} not found in archive", BINARY_NAME))
            })?;

        let target = self.istioctl_path(id);
        let dir = self.distribution_dir(id);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        std::fs::rename(&binary, &target).map_err(|e| StoreError::io(&target, e))?;
        make_executable(&target)?;

        info!("Installed {} at {:?}", id, target);
        Ok(target)
    }
}

/// Depth-first search for `bin/istioctl`. Symlinks are never followed.
fn find_binary(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            if let Some(found) = find_binary(&path)? {
                return Ok(Some(found));
            }
        } else if file_type.is_file()
            && path.file_name().is_some_and(|name| name == BINARY_NAME)
            && path
                .parent()
                .and_then(Path::file_name)
                .is_some_and(|parent| parent == "bin")
        {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| StoreError::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}
