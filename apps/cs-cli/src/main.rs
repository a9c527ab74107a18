//! # cs-cli
//!
//! Chainspect command-line interface.
//!
//! - `chainspect resolve` — resolve direct and ultimate owners for a
//!   project and write `resolved-permissions.json`
//! - `chainspect show` — summarize the last resolved document

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Chainspect — permission resolution for discovered projects.
#[derive(Parser)]
#[command(name = "chainspect", version, about)]
struct Cli {
    /// Project directory holding discovered.json and
    /// permission-overrides.json (defaults to the current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve ownership and write the resolved document.
    Resolve(commands::resolve::ResolveArgs),
    /// Summarize the last resolved document.
    Show,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("cs_engine=info".parse()?)
                .add_directive("cs_store=info".parse()?)
                .add_directive("cs_solver=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(&cli.project_root, &args),
        Commands::Show => commands::show::run(&cli.project_root),
    }
}
