//! Mesh version checks
//!
//! - [`istioctl`]: collect live data plane and control plane versions
//! - [`divergence`]: lowest version per group, advisories and EOL notices
//! - [`error`]: check errors

pub mod divergence;
pub mod error;
pub mod istioctl;

pub use divergence::{
    Advisory, GroupMap, Outcome, build_advisory, collect_lowest_per_group, eol_notices,
    merge_lowest,
};
pub use error::CheckError;
pub use istioctl::{IstioctlReporter, LiveVersions, VersionReporter, collect_live_versions};
