//! Session phase and the derived snapshot.

/// The phase of the session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    /// Before initialization has read the token store.
    Uninitialized,
    /// A validation request is in flight.
    Validating,
    /// The held token was accepted.
    Authenticated,
    /// No token, or the token was rejected.
    Unauthenticated,
}

impl AuthPhase {
    /// Returns the snapshot consumers observe for this phase.
    ///
    /// The snapshot is derived, never stored: `is_loading` holds exactly
    /// while a validation is in flight.
    pub fn snapshot(self) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: matches!(self, AuthPhase::Authenticated),
            is_loading: matches!(self, AuthPhase::Validating),
        }
    }

    /// Whether the machine has settled into a terminal answer.
    pub fn is_settled(self) -> bool {
        matches!(self, AuthPhase::Authenticated | AuthPhase::Unauthenticated)
    }
}

/// The session state visible to navigation and screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthSnapshot {
    /// The held token is currently believed valid.
    pub is_authenticated: bool,
    /// A validation is in flight; the answer is not yet known.
    pub is_loading: bool,
}
