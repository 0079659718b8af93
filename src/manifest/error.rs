use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Manifest not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),
}
