//! scanwatch CLI - Watch a barcode scanner server from the terminal
//!
//! Polls the server for new scans, saves recognized products automatically
//! and asks for a label when an unknown code shows up.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::clear::run_clear;
use crate::commands::common::{load_config, resolve_config_path};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::list::run_list;
use crate::commands::stats::run_stats;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let directive = "scanwatch=info"
        .parse::<Directive>()
        .map_err(|error| CliError::Config(error.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config)?;
    let server = cli.server.as_deref();

    match cli.command {
        Some(Commands::Watch { interval_ms }) => {
            let config = load_config(&config_path, server)?;
            run_watch(&config, interval_ms).await?;
        }
        Some(Commands::List {
            filter,
            sort,
            limit,
            json,
        }) => {
            let config = load_config(&config_path, server)?;
            run_list(&config, &filter, sort, limit, json).await?;
        }
        Some(Commands::Stats { json }) => {
            let config = load_config(&config_path, server)?;
            run_stats(&config, json).await?;
        }
        Some(Commands::Delete { id, yes }) => {
            let config = load_config(&config_path, server)?;
            run_delete(&config, &id, yes).await?;
        }
        Some(Commands::Clear { yes }) => {
            let config = load_config(&config_path, server)?;
            run_clear(&config, yes).await?;
        }
        Some(Commands::Export { format, output }) => {
            let config = load_config(&config_path, server)?;
            run_export(&config, format, output.as_deref()).await?;
        }
        Some(Commands::Config { command }) => run_config(command, &config_path, server)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
