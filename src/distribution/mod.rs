//! Distribution identity and ordering
//!
//! - [`id`]: the `DistributionId` value type with parse/render
//! - [`group`]: group keys and the order within a group
//! - [`error`]: parse and comparison errors

pub mod error;
pub mod group;
pub mod id;

pub use error::DistributionError;
pub use id::DistributionId;
