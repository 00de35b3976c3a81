//! Route protection gate.

use crate::auth::AuthSnapshot;

/// What the navigation layer should do with a requested destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested destination.
    Render,
    /// Show a loading placeholder; re-evaluate when the session settles.
    Pending,
    /// Redirect to the given path.
    RedirectTo(String),
}

/// Pure decision function guarding navigation.
///
/// The gate holds no state of its own; it is recomputed on every navigation
/// from the current [`AuthSnapshot`]. Consumers subscribe to session changes
/// so a `Pending` decision is re-evaluated without user interaction.
#[derive(Clone, Debug)]
pub struct RouteGate {
    login_path: String,
}

impl RouteGate {
    /// Create a gate redirecting to the given login path.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Returns the configured login path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide what to do with a navigation request.
    ///
    /// A loading snapshot always yields `Pending` for guarded routes, even
    /// when a stale `is_authenticated` is still set.
    pub fn decide(&self, snapshot: AuthSnapshot, requires_auth: bool) -> RouteDecision {
        if !requires_auth {
            return RouteDecision::Render;
        }
        if snapshot.is_loading {
            return RouteDecision::Pending;
        }
        if snapshot.is_authenticated {
            RouteDecision::Render
        } else {
            RouteDecision::RedirectTo(self.login_path.clone())
        }
    }
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::new("/login")
    }
}
