//! Command implementations.

pub mod convert;
pub mod gallery;
pub mod login;
pub mod logout;
pub mod register;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use aniwa_client::http::ApiClient;
use aniwa_client::{AuthState, SessionValidator};
use aniwa_core::gate::{RouteDecision, RouteGate};
use aniwa_core::token::{Token, TokenStore};
use aniwa_core::types::ServiceUrl;

use crate::store::FileTokenStore;

/// Build the session machine over the on-disk token store.
pub(crate) fn auth_state(service: &ServiceUrl) -> Result<(AuthState, Arc<FileTokenStore>)> {
    let store = Arc::new(FileTokenStore::open_default()?);
    let validator = SessionValidator::new(ApiClient::new(service.clone()), store.clone());
    let auth = AuthState::new(store.clone(), Arc::new(validator));
    Ok((auth, store))
}

/// Initialize the machine and wait for it to settle.
pub(crate) async fn settled_auth(service: &ServiceUrl) -> Result<(AuthState, Arc<FileTokenStore>)> {
    let (auth, store) = auth_state(service)?;
    auth.initialize();
    auth.settled().await;
    Ok((auth, store))
}

/// Gate a command that needs an active session.
///
/// Commands are navigations here: a redirect decision becomes a pointer at
/// `aniwa login` instead of a route change.
pub(crate) async fn require_token(service: &ServiceUrl) -> Result<Token> {
    let (auth, store) = settled_auth(service).await?;
    let gate = RouteGate::default();

    match gate.decide(auth.snapshot(), true) {
        RouteDecision::Render => store.get().context("session settled but no token on disk"),
        RouteDecision::RedirectTo(_) => bail!("Not logged in. Run `aniwa login` first."),
        RouteDecision::Pending => bail!("Session is still validating; try again."),
    }
}
