//! Status command implementation.

use anyhow::Result;
use colored::Colorize;

use aniwa_core::types::ServiceUrl;

use crate::commands::settled_auth;
use crate::output;

pub async fn run(service: &ServiceUrl) -> Result<()> {
    eprintln!("{}", "Checking session...".dimmed());

    let (auth, _store) = settled_auth(service).await?;
    let snapshot = auth.snapshot();

    output::field("Service", service.as_str());
    if snapshot.is_authenticated {
        output::success("Session active");
    } else {
        output::error("No active session. Run `aniwa login` to start one.");
    }

    Ok(())
}
