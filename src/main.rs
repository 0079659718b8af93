use std::process::ExitCode;

use clap::Parser;

use getmesh::check::Outcome;
use getmesh::cli::{Cli, Context};
use getmesh::config::home_dir;
use getmesh::logging::init_logging;
use getmesh::manifest::manifest_source_from_env;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let manifest = manifest_source_from_env()?;
    let mut stdout = std::io::stdout();
    let mut ctx = Context {
        home: home_dir(),
        manifest: &*manifest,
        out: &mut stdout,
    };

    let outcome = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli.command.execute(&mut ctx))?;

    Ok(match outcome {
        Outcome::Clean => ExitCode::SUCCESS,
        Outcome::IssuesFound => ExitCode::FAILURE,
    })
}
