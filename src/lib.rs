//! Lifecycle manager for Istio distributions
//!
//! ```text
//! raw strings ──▶ DistributionId ──▶ group ──▶ catalog query ──▶ advisory
//!  (istioctl,       (parse/render)    (order)   (latest, security)  (check)
//!   store dirs)
//! ```
//!
//! - [`distribution`]: identity, canonical form and in-group ordering
//! - [`manifest`]: the published catalog and latest-in-group queries
//! - [`check`]: live mesh versions, divergence and advisories
//! - [`store`]: locally installed distributions
//! - [`cli`]: subcommands

pub mod check;
pub mod cli;
pub mod config;
pub mod distribution;
pub mod logging;
pub mod manifest;
pub mod store;
