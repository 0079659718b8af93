use thiserror::Error;

use crate::distribution::DistributionError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error("Failed to run {command}: {source}")]
    Exec {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Invalid version output: {0}")]
    InvalidOutput(String),
}
