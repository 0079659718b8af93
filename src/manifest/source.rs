//! Where the catalog comes from: the published manifest URL or a local file

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::config::{DEFAULT_MANIFEST_URL, HTTP_TIMEOUT_SECS, MANIFEST_PATH_ENV, USER_AGENT};
use crate::manifest::error::ManifestError;
use crate::manifest::types::Catalog;

/// Trait for loading the catalog
///
/// The catalog is loaded once per command invocation and never cached.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, ManifestError>;
}

/// Manifest served over HTTP
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
}

impl HttpManifestSource {
    pub fn new(url: &str) -> Result<Self, ManifestError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_catalog(&self) -> Result<Catalog, ManifestError> {
        debug!("Fetching manifest from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ManifestError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Manifest server returned status {}: {}", status, self.url);
            return Err(ManifestError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await?;
        Catalog::from_json(&body)
    }
}

/// Manifest read from disk, used for testing against a pinned catalog
pub struct FileManifestSource {
    path: PathBuf,
}

impl FileManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ManifestSource for FileManifestSource {
    async fn fetch_catalog(&self) -> Result<Catalog, ManifestError> {
        debug!("Reading manifest from {:?}", self.path);

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ManifestError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Catalog::from_json(&body)
    }
}

/// Pick the manifest source: a local file when `GETMESH_TEST_MANIFEST_PATH`
/// is set, otherwise the published URL.
pub fn manifest_source_from_env() -> Result<Box<dyn ManifestSource>, ManifestError> {
    manifest_source_with_env(std::env::var(MANIFEST_PATH_ENV).ok())
}

fn manifest_source_with_env(
    manifest_path: Option<String>,
) -> Result<Box<dyn ManifestSource>, ManifestError> {
    match manifest_path.filter(|p| !p.is_empty()) {
        Some(path) => Ok(Box::new(FileManifestSource::new(path))),
        None => Ok(Box::new(HttpManifestSource::new(DEFAULT_MANIFEST_URL)?)),
    }
}
