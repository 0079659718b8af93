//! `getmesh istioctl ...`: run the active binary

use std::process::Command;

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use tracing::debug;

use crate::check::Outcome;
use crate::cli::Context;
use crate::store::StoreError;

/// Subcommands that accept `--set hub=...`
const HUB_AWARE_SUBCOMMANDS: [&str; 2] = ["install", "manifest"];

#[derive(Args, Debug, Default)]
pub struct IstioctlCommand {
    /// Arguments passed to istioctl
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl IstioctlCommand {
    /// Runs istioctl with inherited stdio. A non-zero exit of istioctl is
    /// reported as `IssuesFound`.
    pub fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let config = ctx.load_config()?;
        let active = config
            .distribution
            .ok_or_else(|| anyhow!("no active distribution; run `getmesh fetch` first"))?;

        let store = ctx.store();
        if !store.is_installed(&active) {
            return Err(StoreError::NotInstalled(active.to_string()).into());
        }

        let binary = store.istioctl_path(&active);
        let args = with_default_hub(&self.args, config.default_hub.as_deref());
        debug!("Running {:?} {:?}", binary, args);

        let status = Command::new(&binary)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to run {}", binary.display()))?;

        Ok(if status.success() {
            Outcome::Clean
        } else {
            Outcome::IssuesFound
        })
    }
}

/// Append `--set hub=<hub>` to install-like invocations that do not set one
pub fn with_default_hub(args: &[String], hub: Option<&str>) -> Vec<String> {
    let mut args = args.to_vec();
    let Some(hub) = hub else {
        return args;
    };

    let hub_aware = args
        .first()
        .is_some_and(|sub| HUB_AWARE_SUBCOMMANDS.contains(&sub.as_str()));
    let has_hub = args.iter().any(|arg| arg.contains("hub="));
    if hub_aware && !has_hub {
        args.push("--set".to_string());
        args.push(format!("hub={}", hub));
    }
    args
}
