//! aniwa - CLI for the anime-style conversion service.
//!
//! This is a thin shell over the `aniwa-client` library: it owns the
//! durable token store and the terminal output, and delegates the session
//! lifecycle and backend calls to the library.

mod cli;
mod commands;
mod output;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use aniwa_core::ServiceUrl;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let service = ServiceUrl::new(&cli.service).context("Invalid service URL")?;

    match cli.command {
        Commands::Login(args) => commands::login::run(&service, args).await,
        Commands::Register(args) => commands::register::run(&service, args).await,
        Commands::Logout => commands::logout::run(&service).await,
        Commands::Status => commands::status::run(&service).await,
        Commands::Convert(args) => commands::convert::run(&service, args).await,
        Commands::Gallery(args) => commands::gallery::run(&service, args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
