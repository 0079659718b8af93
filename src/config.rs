use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distribution::DistributionId;

// =============================================================================
// Remote endpoints
// =============================================================================

/// Published catalog of distributions
pub const DEFAULT_MANIFEST_URL: &str = "https://istio.tetratelabs.io/getmesh/manifest.json";

/// Base URL for distribution archives
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://istio.tetratelabs.io/getmesh/files";

/// Timeout for HTTP requests (60 seconds; archives are tens of megabytes)
pub const HTTP_TIMEOUT_SECS: u64 = 60;

pub const USER_AGENT: &str = concat!("getmesh/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Environment overrides
// =============================================================================

pub const HOME_ENV: &str = "GETMESH_HOME";
pub const MANIFEST_PATH_ENV: &str = "GETMESH_TEST_MANIFEST_PATH";
pub const DOWNLOAD_BASE_URL_ENV: &str = "GETMESH_DOWNLOAD_BASE_URL";
pub const LOG_ENV: &str = "GETMESH_LOG";

/// Flavor picked by `fetch` when none is given
pub const DEFAULT_FLAVOR: &str = "tetrate";

const CONFIG_FILE: &str = "config.json";

/// Persisted active configuration
///
/// Loaded and saved explicitly by the command layer; nothing else reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub distribution: Option<DistributionId>,
    pub default_hub: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Load `<home>/config.json`; a missing file yields the default config.
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = config_path(home);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self, home: &Path) -> Result<(), ConfigError> {
        let path = config_path(home);
        std::fs::create_dir_all(home).map_err(|source| ConfigError::Io {
            path: home.to_path_buf(),
            source,
        })?;

        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })
    }
}

/// Returns the getmesh home directory.
/// Uses $GETMESH_HOME if set, otherwise ~/.getmesh,
/// or ./.getmesh if no home directory is available.
pub fn home_dir() -> PathBuf {
    home_dir_with_env(std::env::var(HOME_ENV).ok(), dirs::home_dir())
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

/// Base URL for archives, overridable through $GETMESH_DOWNLOAD_BASE_URL.
pub fn download_base_url() -> String {
    std::env::var(DOWNLOAD_BASE_URL_ENV)
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_BASE_URL.to_string())
}

fn home_dir_with_env(getmesh_home: Option<String>, user_home: Option<PathBuf>) -> PathBuf {
    getmesh_home
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| user_home.map(|home| home.join(".getmesh")))
        .unwrap_or_else(|| PathBuf::from("./.getmesh"))
}
