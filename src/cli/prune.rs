//! `getmesh prune`: remove installed distributions

use anyhow::Result;
use clap::Args;

use crate::check::Outcome;
use crate::cli::Context;
use crate::distribution::DistributionId;
use crate::store::StoreError;

#[derive(Args, Debug, Default)]
pub struct PruneCommand {
    /// Remove only this distribution (default: all but the active one)
    #[arg(long)]
    pub name: Option<String>,
}

impl PruneCommand {
    pub fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let store = ctx.store();
        let active = ctx.load_config()?.distribution;

        let targets: Vec<DistributionId> = match &self.name {
            Some(name) => {
                let id = DistributionId::parse(name)?;
                if active.as_ref() == Some(&id) {
                    return Err(StoreError::ActiveDistribution(id.to_string()).into());
                }
                vec![id]
            }
            None => store
                .installed()?
                .into_iter()
                .filter(|id| active.as_ref() != Some(id))
                .collect(),
        };

        for id in &targets {
            store.remove(id)?;
            writeln!(ctx.out, "removed {}", id)?;
        }
        if targets.is_empty() {
            writeln!(ctx.out, "nothing to prune")?;
        }

        Ok(Outcome::Clean)
    }
}
