//! `getmesh default-hub`: image hub injected into install commands

use anyhow::Result;
use clap::Args;

use crate::check::Outcome;
use crate::cli::Context;

#[derive(Args, Debug, Default)]
pub struct DefaultHubCommand {
    /// Set the default hub, e.g. docker.io/tetrate
    #[arg(long, conflicts_with = "remove")]
    pub set: Option<String>,

    /// Remove the configured default hub
    #[arg(long)]
    pub remove: bool,
}

impl DefaultHubCommand {
    pub fn execute(&self, ctx: &mut Context<'_>) -> Result<Outcome> {
        let mut config = ctx.load_config()?;

        if let Some(hub) = &self.set {
            config.default_hub = Some(hub.clone());
            ctx.save_config(&config)?;
            writeln!(ctx.out, "the default hub is now set to {}", hub)?;
        } else if self.remove {
            config.default_hub = None;
            ctx.save_config(&config)?;
            writeln!(ctx.out, "the default hub is removed")?;
        } else {
            match &config.default_hub {
                Some(hub) => writeln!(ctx.out, "the current default hub is {}", hub)?,
                None => writeln!(ctx.out, "no default hub is set")?,
            }
        }

        Ok(Outcome::Clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::unused_manifest;
    use crate::config::Config;
    use tempfile::TempDir;

    fn run(home: &TempDir, cmd: DefaultHubCommand) -> String {
        let manifest = unused_manifest();
        let mut out = Vec::new();
        let mut ctx = Context {
            home: home.path().to_path_buf(),
            manifest: &manifest,
            out: &mut out,
        };
        cmd.execute(&mut ctx).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn set_show_and_remove() {
        let home = TempDir::new().unwrap();

        assert_eq!(run(&home, DefaultHubCommand::default()), "no default hub is set\n");

        run(
            &home,
            DefaultHubCommand {
                set: Some("docker.io/tetrate".to_string()),
                remove: false,
            },
        );
        assert_eq!(
            Config::load(home.path()).unwrap().default_hub.as_deref(),
            Some("docker.io/tetrate")
        );
        assert_eq!(
            run(&home, DefaultHubCommand::default()),
            "the current default hub is docker.io/tetrate\n"
        );

        run(
            &home,
            DefaultHubCommand {
                set: None,
                remove: true,
            },
        );
        assert_eq!(Config::load(home.path()).unwrap().default_hub, None);
    }
}
