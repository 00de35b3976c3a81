//! Logout command implementation.

use anyhow::Result;
use tracing::warn;

use aniwa_client::Client;
use aniwa_core::token::TokenStore;
use aniwa_core::types::ServiceUrl;

use crate::commands::auth_state;
use crate::output;

pub async fn run(service: &ServiceUrl) -> Result<()> {
    let (auth, store) = auth_state(service)?;

    // Best-effort server-side drop; local logout proceeds regardless.
    if let Some(token) = store.get() {
        let client = Client::new(service.clone());
        if let Err(e) = client.logout(&token).await {
            warn!(error = %e, "server-side logout failed, dropping local session anyway");
        }
    }

    auth.logout();
    output::success("Logged out");

    Ok(())
}
