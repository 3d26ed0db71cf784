mod cli;
mod config;
mod drivers;
mod error;
mod ops;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::MongitConfig;
use utils::process::SystemRunner;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mongit=debug" } else { "mongit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let workdir = std::env::current_dir().context("cannot determine working directory")?;
    let config =
        MongitConfig::load(cli.config.as_deref(), &workdir)?.with_overrides(cli.docker, cli.uri);
    let runner = SystemRunner::new(workdir);

    match cli.command {
        Commands::Init => ops::do_init(&config, &runner)?,
        Commands::Branch { name } => ops::do_branch(&config, &runner, &name)?,
        Commands::Snapshot { label } => ops::do_snapshot(&config, &runner, &label)?,
        Commands::Use { label } => ops::do_use(&config, &runner, &label)?,
        Commands::List => ops::do_list(&config, &runner)?,
        Commands::Other(args) => {
            // Unknown commands are reported but still exit 0.
            let name = args.first().map(String::as_str).unwrap_or_default();
            eprintln!(
                "{} {}",
                "✖".red().bold(),
                format!("Command not found: {}", name).red()
            );
        }
    }

    Ok(())
}
