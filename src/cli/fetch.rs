//! `getmesh fetch`: download a distribution and make it active

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use tracing::info;

use crate::check::Outcome;
use crate::cli::Context;
use crate::config::download_base_url;
use crate::store::fetch::{
    Downloader, FetchRequest, archive_url, current_platform, resolve_fetch_target,
};

#[derive(Args, Debug, Default)]
pub struct FetchCommand {
    /// Istio version, e.g. 1.8.3 (default: newest in the catalog)
    #[arg(long)]
    pub version: Option<String>,

    /// Flavor, e.g. tetrate, tetratefips, istio
    #[arg(long)]
    pub flavor: Option<String>,

    /// Flavor version (default: newest for the version and flavor)
    #[arg(long)]
    pub flavor_version: Option<i64>,
}

impl FetchCommand {
    pub async fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let platform = current_platform()
            .ok_or_else(|| anyhow!("no distribution archives are published for this platform"))?;
        self.fetch_from(ctx, &download_base_url(), platform).await
    }

    pub async fn fetch_from(
        &self,
        ctx: &mut Context<'_>,
        base_url: &str,
        platform: &str,
    ) -> Result<Outcome> {
        let catalog = ctx.catalog().await?;
        let request = FetchRequest {
            version: self.version.clone(),
            flavor: self.flavor.clone(),
            flavor_version: self.flavor_version,
        };
        let entry = resolve_fetch_target(&catalog, &request)?;
        let id = &entry.id;
        let store = ctx.store();

        if store.is_installed(id) {
            info!("{} already installed at {:?}", id, store.istioctl_path(id));
            writeln!(ctx.out, "{} already fetched", id)?;
        } else {
            let url = archive_url(base_url, id, platform);
            writeln!(ctx.out, "fetching {} ...", id)?;
            let archive = Downloader::new()?.download(&url).await?;
            store
                .install_from_archive(id, archive.as_slice())
                .with_context(|| format!("Failed to install {}", id))?;
        }

        if !entry.release_notes.is_empty() {
            writeln!(
                ctx.out,
                "For more information about {}, please refer to the release notes:\n- {}",
                id,
                entry.release_notes.join("\n- ")
            )?;
        }

        let mut config = ctx.load_config()?;
        config.distribution = Some(id.clone());
        ctx.save_config(&config)?;
        writeln!(ctx.out, "istioctl switched to {} now", id)?;

        Ok(Outcome::Clean)
    }
}
