//! Token validation against the backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use aniwa_core::token::{Token, TokenStore};
use aniwa_core::traits::TokenValidator;

use crate::http::endpoints::VALIDATE_TOKEN;
use crate::http::ApiClient;

/// Checks a held token against the fixed validation endpoint.
///
/// Resolves `true` only on an explicit success status. Any non-success
/// status, timeout, or transport failure resolves `false` and clears the
/// injected store, so a known-bad token is never retried. The caller decides
/// retry policy; this type never retries on its own.
#[derive(Clone)]
pub struct SessionValidator {
    http: ApiClient,
    store: Arc<dyn TokenStore>,
}

impl SessionValidator {
    /// Create a validator clearing the given store on failure.
    pub fn new(http: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self { http, store }
    }
}

#[async_trait]
impl TokenValidator for SessionValidator {
    #[instrument(skip(self, token))]
    async fn validate(&self, token: &Token) -> bool {
        match self.http.get_ok_authed(VALIDATE_TOKEN, token).await {
            Ok(()) => {
                debug!("token accepted");
                true
            }
            Err(e) => {
                // Failures collapse to false; the token is presumed dead.
                debug!(error = %e, "token rejected, clearing store");
                self.store.clear();
                false
            }
        }
    }
}

impl std::fmt::Debug for SessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionValidator")
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}
