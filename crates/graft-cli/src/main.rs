//! graft CLI
//!
//! Resolves the package graph rooted at a directory and prints the merged
//! configuration.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let logging = logging::init(cli.verbose)?;
    tracing::debug!(?cli, "parsed arguments");

    let options = cli.loader_options()?;
    let mut stdout = std::io::stdout().lock();

    let command = cli.command.unwrap_or(Commands::Show {
        namespace: None,
        compact: false,
    });

    match command {
        Commands::Packages { json } => commands::run_packages(&mut stdout, &options, json),
        Commands::Show { namespace, compact } => {
            let context = bootstrap(&options, &logging)?;
            commands::run_show(&mut stdout, &context, namespace.as_deref(), compact)
        }
        Commands::Get { pointer } => {
            let context = bootstrap(&options, &logging)?;
            commands::run_get(&mut stdout, &context, &pointer)
        }
    }
}

fn bootstrap(options: &graft_core::LoaderOptions, logging: &logging::Logging) -> Result<AppContext> {
    let context = AppContext::bootstrap(options)?;
    logging.configure(&context.log)?;
    Ok(context)
}
