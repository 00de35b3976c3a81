//! Seams between the session machine and its collaborators.

use async_trait::async_trait;

use crate::token::Token;

/// Checks whether a held token is currently accepted by the backend.
///
/// Implementations never fail the caller: transport errors, timeouts, and
/// non-success statuses all collapse to `false`. Resolving `false` clears
/// the token store as a side effect, so a known-bad token is not retried.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate the token. Best-effort; no automatic retry.
    async fn validate(&self, token: &Token) -> bool;
}

/// Policy hook fired when the backend rejects the bearer token on an
/// authenticated call.
///
/// Injected into the HTTP layer instead of a hard-coded navigation so the
/// owning shell decides what a 401 means (and tests can substitute a no-op).
pub trait UnauthorizedHook: Send + Sync {
    /// Called once per rejected request.
    fn on_unauthorized(&self);
}

/// Hook that does nothing. The default for library consumers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopUnauthorizedHook;

impl UnauthorizedHook for NoopUnauthorizedHook {
    fn on_unauthorized(&self) {}
}
