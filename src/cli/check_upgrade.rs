//! `getmesh check-upgrade`: compare the running mesh with the catalog

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::Args;

use crate::check::{
    IstioctlReporter, Outcome, VersionReporter, build_advisory, collect_live_versions,
    collect_lowest_per_group, eol_notices, merge_lowest,
};
use crate::cli::Context;

#[derive(Args, Debug, Default)]
pub struct CheckUpgradeCommand {}

impl CheckUpgradeCommand {
    pub async fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let active = ctx
            .load_config()?
            .distribution
            .ok_or_else(|| anyhow!("no active distribution; run `getmesh fetch` first"))?;
        let reporter = IstioctlReporter::new(ctx.store().istioctl_path(&active));
        let today = chrono::Local::now().date_naive();

        self.check(ctx, &reporter, today).await
    }

    /// Fail-closed: any malformed version aborts before advice is printed.
    pub async fn check(
        &self,
        ctx: &mut Context<'_>,
        reporter: &dyn VersionReporter,
        today: NaiveDate,
    ) -> Result<Outcome> {
        let catalog = ctx.catalog().await?;
        let live = collect_live_versions(reporter)?;

        let data_plane = collect_lowest_per_group(&live.data_plane)?;
        let control_plane = collect_lowest_per_group(&live.control_plane)?;
        let advisory = build_advisory(&data_plane, &control_plane, &catalog)?;
        let notices = eol_notices(&merge_lowest(&data_plane, &control_plane)?, &catalog, today)?;

        writeln!(ctx.out, "[Summary of your Istio mesh]")?;
        writeln!(
            ctx.out,
            "active istioctl version: {}",
            live.client.as_deref().unwrap_or("unknown")
        )?;
        writeln!(ctx.out, "data plane version: {}", summarize(&live.data_plane))?;
        writeln!(ctx.out, "control plane version: {}", summarize(&live.control_plane))?;
        writeln!(ctx.out)?;
        writeln!(ctx.out, "[GetMesh Check]")?;
        for message in advisory.messages.iter().chain(&notices) {
            writeln!(ctx.out, "- {}", message)?;
        }

        let eol_outcome = if notices.is_empty() {
            Outcome::Clean
        } else {
            Outcome::IssuesFound
        };
        Ok(advisory.outcome.combine(eol_outcome))
    }
}

/// `1.8.3-tetrate-v0 (2 instances), ...` in version order
fn summarize(versions: &[String]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for version in versions {
        *counts.entry(version.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(version, count)| match count {
            1 => format!("{} (1 instance)", version),
            n => format!("{} ({} instances)", version, n),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
