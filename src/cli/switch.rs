//! `getmesh switch`: change the active distribution

use anyhow::{Result, bail};
use clap::Args;

use crate::check::Outcome;
use crate::cli::Context;
use crate::config::DEFAULT_FLAVOR;
use crate::distribution::DistributionId;
use crate::store::StoreError;

#[derive(Args, Debug, Default)]
pub struct SwitchCommand {
    /// Canonical distribution name, e.g. 1.8.3-tetrate-v0
    #[arg(long, conflicts_with_all = ["version", "flavor", "flavor_version"])]
    pub name: Option<String>,

    /// Istio version, e.g. 1.8.3
    #[arg(long)]
    pub version: Option<String>,

    /// Flavor (default: tetrate)
    #[arg(long)]
    pub flavor: Option<String>,

    /// Flavor version (default: 0)
    #[arg(long)]
    pub flavor_version: Option<i64>,
}

impl SwitchCommand {
    pub fn target(&self) -> Result<DistributionId> {
        if let Some(name) = &self.name {
            return Ok(DistributionId::parse(name)?);
        }

        let Some(version) = &self.version else {
            bail!("either --name or --version is required");
        };
        let name = format!(
            "{}-{}-v{}",
            version,
            self.flavor.as_deref().unwrap_or(DEFAULT_FLAVOR),
            self.flavor_version.unwrap_or(0)
        );
        Ok(DistributionId::parse(&name)?)
    }

    pub fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let target = self.target()?;
        if !ctx.store().is_installed(&target) {
            return Err(StoreError::NotInstalled(target.to_string()).into());
        }

        let mut config = ctx.load_config()?;
        config.distribution = Some(target.clone());
        ctx.save_config(&config)?;

        writeln!(ctx.out, "istioctl switched to {} now", target)?;
        Ok(Outcome::Clean)
    }
}
