//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use aniwa_client::Client;
use aniwa_core::types::ServiceUrl;

use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(service: &ServiceUrl, args: RegisterArgs) -> Result<()> {
    let client = Client::new(service.clone());

    eprintln!("{}", "Creating account...".dimmed());

    client
        .register(&args.username, &args.email, &args.password)
        .await
        .context("Failed to create account")?;

    output::success("Account created");
    println!();
    output::field("Username", &args.username);
    println!("Run `aniwa login` to start a session.");

    Ok(())
}
