//! quire CLI - query a blog's chained article archive
//!
//! This is the main entry point for the quire command-line interface.
//! Command implementations live in the `commands` module.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use quire_core::Archive;

mod cli;
mod commands;
mod error;
mod output;
mod utils;

use cli::{CacheCommand, Cli, Commands};
use commands::Outcome;
use output::Printer;
use utils::logging::initialize_logging;
use utils::settings::load_config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = initialize_logging(&cli) {
        eprintln!("Failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match execute_command(cli).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NotFound) => ExitCode::from(error::NOT_FOUND),
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::from(error::exit_code(&err))
        },
    }
}

async fn execute_command(cli: Cli) -> Result<Outcome> {
    let config = load_config(&cli)?;
    let format = cli.command.format().unwrap_or_default();
    let mut printer = Printer::new(format, io::stdout());

    if let Commands::Cache { command } = &cli.command {
        return match command {
            CacheCommand::List { .. } => commands::list_cache(&config.cache.root, &mut printer).await,
            CacheCommand::Clear => commands::clear_cache(&config.cache.root, io::stdout()).await,
        };
    }

    let archive = Archive::open(&config)
        .await
        .context("Failed to open archive")?;

    match cli.command {
        Commands::Latest { count, .. } => commands::latest(&archive, count, &mut printer).await,
        Commands::Get { id, .. } => commands::by_id(&archive, &id, &mut printer).await,
        Commands::Slug { slug, .. } => commands::by_slug(&archive, &slug, &mut printer).await,
        Commands::Show { route, .. } => commands::show_route(&archive, &route, &mut printer).await,
        Commands::Range { from, to, .. } => {
            commands::by_date(&archive, &from, &to, &mut printer).await
        },
        Commands::Tags { tags, .. } => commands::by_tags(&archive, &tags, &mut printer).await,
        Commands::Authors { authors, .. } => {
            commands::by_authors(&archive, &authors, &mut printer).await
        },
        Commands::Adjacent { id, .. } => commands::adjacent(&archive, &id, &mut printer).await,
        // Handled before the archive is opened
        Commands::Cache { .. } => Ok(Outcome::Done),
    }
}
