//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use aniwa_client::Client;
use aniwa_core::credentials::Credentials;
use aniwa_core::types::ServiceUrl;

use crate::commands::auth_state;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(service: &ServiceUrl, args: LoginArgs) -> Result<()> {
    let client = Client::new(service.clone());
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let token = client
        .login(&credentials)
        .await
        .context("Failed to log in")?;

    // Token writes funnel through the session machine, never the store
    // directly.
    let (auth, _store) = auth_state(service)?;
    auth.login(token);

    output::success("Logged in successfully");
    println!();
    output::field("Service", service.as_str());
    output::field("Username", &args.username);

    Ok(())
}
