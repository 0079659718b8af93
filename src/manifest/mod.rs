//! Remote catalog of published distributions
//!
//! - [`types`]: `Catalog` and `CatalogEntry` as deserialized from the manifest
//! - [`query`]: latest-in-group and security patch detection
//! - [`source`]: HTTP and file manifest sources
//! - [`error`]: manifest loading errors

pub mod error;
pub mod query;
pub mod source;
pub mod types;

pub use error::ManifestError;
pub use query::{LatestInGroup, find_latest_in_group};
pub use source::{FileManifestSource, HttpManifestSource, ManifestSource, manifest_source_from_env};
pub use types::{Catalog, CatalogEntry};
