use std::path::PathBuf;

use thiserror::Error;

use crate::distribution::DistributionError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error("{0} is not installed; fetch it first with `getmesh fetch`")]
    NotInstalled(String),

    #[error("no distribution in the catalog matches {0}")]
    NotInCatalog(String),

    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid archive: {0}")]
    Archive(String),

    #[error("{0} is the active distribution and cannot be removed")]
    ActiveDistribution(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
