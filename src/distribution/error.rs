use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    #[error("invalid version segment {segment:?} in {input:?}: expected major.minor.patch")]
    MalformedVersion { segment: String, input: String },

    #[error("invalid flavor segment {segment:?} in {input:?}: {reason}")]
    MalformedFlavor {
        segment: String,
        input: String,
        reason: &'static str,
    },

    #[error("cannot compare distributions in different groups: {left} and {right}")]
    IncomparableGroups { left: String, right: String },
}
