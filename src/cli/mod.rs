//! Command-line interface
//!
//! Each subcommand lives in its own module with an argument struct and an
//! `execute` method. Commands receive an explicit [`Context`] (home
//! directory, manifest source, output writer) and load or save the active
//! [`Config`] themselves; nothing is held in globals.

pub mod check_upgrade;
pub mod default_hub;
pub mod fetch;
pub mod istioctl;
pub mod list;
pub mod prune;
pub mod show;
pub mod switch;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use crate::check::Outcome;
use crate::config::Config;
use crate::manifest::{Catalog, ManifestSource};
use crate::store::Store;

#[derive(Parser)]
#[command(name = "getmesh")]
#[command(version, about = "Lifecycle manager for Istio distributions")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List distributions available in the catalog
    List(list::ListCommand),
    /// Download a distribution and make it active
    Fetch(fetch::FetchCommand),
    /// Show locally installed distributions
    Show(show::ShowCommand),
    /// Switch the active distribution
    Switch(switch::SwitchCommand),
    /// Remove installed distributions
    Prune(prune::PruneCommand),
    /// Show or change the default image hub
    DefaultHub(default_hub::DefaultHubCommand),
    /// Run the active istioctl
    Istioctl(istioctl::IstioctlCommand),
    /// Check the running mesh for available upgrades
    CheckUpgrade(check_upgrade::CheckUpgradeCommand),
    /// Print getmesh and active distribution versions
    Version,
}

/// Everything a command needs from its environment
pub struct Context<'a> {
    pub home: PathBuf,
    pub manifest: &'a dyn ManifestSource,
    pub out: &'a mut dyn Write,
}

impl Context<'_> {
    pub fn store(&self) -> Store {
        Store::new(&self.home)
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.home).context("Failed to load getmesh config")
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config
            .save(&self.home)
            .context("Failed to save getmesh config")
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        self.manifest
            .fetch_catalog()
            .await
            .context("Failed to load the distribution catalog")
    }
}

impl Command {
    pub async fn execute(self, ctx: &mut Context<'_>) -> Result<Outcome> {
        match self {
            Command::List(cmd) => cmd.execute(ctx).await,
            Command::Fetch(cmd) => cmd.execute(ctx).await,
            Command::Show(cmd) => cmd.execute(ctx).await,
            Command::Switch(cmd) => cmd.execute(ctx),
            Command::Prune(cmd) => cmd.execute(ctx),
            Command::DefaultHub(cmd) => cmd.execute(ctx),
            Command::Istioctl(cmd) => cmd.execute(ctx),
            Command::CheckUpgrade(cmd) => cmd.execute(ctx).await,
            Command::Version => print_version(ctx),
        }
    }
}

fn print_version(ctx: &mut Context<'_>) -> Result<Outcome> {
    let config = ctx.load_config()?;
    writeln!(ctx.out, "getmesh version: {}", env!("CARGO_PKG_VERSION"))?;
    match config.distribution {
        Some(active) => writeln!(ctx.out, "active istioctl: {}", active)?,
        None => writeln!(ctx.out, "active istioctl: none")?,
    }
    Ok(Outcome::Clean)
}
