//! `getmesh show`: installed distributions and how they compare to the catalog

use anyhow::Result;
use clap::Args;
use tracing::warn;

use crate::check::Outcome;
use crate::cli::Context;
use crate::distribution::DistributionId;
use crate::store::{InstallStatus, InstalledStatus, installed_status};

#[derive(Args, Debug, Default)]
pub struct ShowCommand {}

impl ShowCommand {
    /// Lists installed distributions. Reports `IssuesFound` when any tracked
    /// install has a newer patch or an unsupported group. The catalog is
    /// optional here: if it cannot be loaded the list is printed without status.
    pub async fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let installed = ctx.store().installed()?;
        let config = ctx.load_config()?;

        if installed.is_empty() {
            writeln!(ctx.out, "no distributions fetched yet; run `getmesh fetch`")?;
            return Ok(Outcome::Clean);
        }

        let statuses = match ctx.catalog().await {
            Ok(catalog) => Some(installed_status(&installed, &catalog)?),
            Err(e) => {
                warn!("Showing installed distributions without catalog status: {:#}", e);
                None
            }
        };

        let mut outcome = Outcome::Clean;
        for (index, id) in installed.iter().enumerate() {
            let status = statuses.as_ref().map(|s| &s[index]);
            let line = render_line(id, config.distribution.as_ref(), status);
            writeln!(ctx.out, "{}", line)?;
            if let Some(InstalledStatus {
                status: InstallStatus::Outdated { .. } | InstallStatus::Unsupported,
                ..
            }) = status
            {
                outcome = Outcome::IssuesFound;
            }
        }

        Ok(outcome)
    }
}

fn render_line(
    id: &DistributionId,
    active: Option<&DistributionId>,
    status: Option<&InstalledStatus>,
) -> String {
    let mut line = id.to_string();
    if active == Some(id) {
        line.push_str(" (Active)");
    }

    match status.map(|s| &s.status) {
        Some(InstallStatus::Outdated { latest, security: true }) => {
            line.push_str(&format!(" [security patch available: {}]", latest));
        }
        Some(InstallStatus::Outdated { latest, security: false }) => {
            line.push_str(&format!(" [patch available: {}]", latest));
        }
        Some(InstallStatus::Unsupported) => line.push_str(" [no longer supported]"),
        Some(InstallStatus::Latest) | Some(InstallStatus::Untracked) | None => {}
    }
    line
}
