//! Reactive session state machine.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use aniwa_core::auth::{AuthPhase, AuthSnapshot};
use aniwa_core::token::{Token, TokenStore};
use aniwa_core::traits::TokenValidator;

/// Process-wide session state machine.
///
/// Combines the token store with validation results and exposes an atomic
/// [`AuthSnapshot`] plus the mutators `login`, `logout`, and `validate_now`.
/// Cheap to clone (internal `Arc`); one instance per running app, constructed
/// explicitly and handed to whoever owns the navigation layer.
///
/// Concurrent `validate_now` calls for the same token coalesce into a single
/// backend check whose result fans out to every caller. A result that lands
/// after an intervening `login` or `logout` is discarded (generation guard),
/// so a stale answer never clobbers newer state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use aniwa_client::{AuthState, SessionValidator};
/// use aniwa_client::http::ApiClient;
/// use aniwa_core::{MemoryTokenStore, ServiceUrl};
///
/// # async fn example() -> Result<(), aniwa_core::Error> {
/// let service = ServiceUrl::new("https://api.aniwa.dev")?;
/// let store = Arc::new(MemoryTokenStore::new());
/// let validator = SessionValidator::new(ApiClient::new(service), store.clone());
/// let auth = AuthState::new(store, Arc::new(validator));
/// auth.initialize();
/// let snapshot = auth.settled().await;
/// println!("authenticated: {}", snapshot.is_authenticated);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AuthState {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    validator: Arc<dyn TokenValidator>,
    machine: Mutex<Machine>,
    phase_tx: watch::Sender<AuthPhase>,
    // At most one validation in flight; concurrent callers share its receiver.
    inflight: Mutex<Option<watch::Receiver<Option<bool>>>>,
}

struct Machine {
    phase: AuthPhase,
    // Bumped by login/logout; validation results from an older generation
    // are stale and discarded.
    generation: u64,
}

impl AuthState {
    /// Create a new machine in the `Uninitialized` phase.
    pub fn new(store: Arc<dyn TokenStore>, validator: Arc<dyn TokenValidator>) -> Self {
        let (phase_tx, _) = watch::channel(AuthPhase::Uninitialized);
        Self {
            inner: Arc::new(Inner {
                store,
                validator,
                machine: Mutex::new(Machine {
                    phase: AuthPhase::Uninitialized,
                    generation: 0,
                }),
                phase_tx,
                inflight: Mutex::new(None),
            }),
        }
    }

    /// Perform the start-up transition.
    ///
    /// With no stored token the machine settles to `Unauthenticated`
    /// immediately, never entering `Validating`. With a stored token it
    /// enters `Validating` and the check runs asynchronously; subscribe or
    /// call [`AuthState::settled`] to observe the outcome. Idempotent after
    /// the first call.
    pub fn initialize(&self) {
        let has_token = self.inner.store.get().is_some();
        {
            let mut machine = self.inner.machine.lock().unwrap();
            if machine.phase != AuthPhase::Uninitialized {
                return;
            }
            machine.phase = if has_token {
                AuthPhase::Validating
            } else {
                AuthPhase::Unauthenticated
            };
            let _ = self.inner.phase_tx.send(machine.phase);
        }

        if has_token {
            let state = self.clone();
            tokio::spawn(async move {
                state.validate_now().await;
            });
        }
    }

    /// Returns the current snapshot. Atomic: never a half-updated view.
    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.machine.lock().unwrap().phase.snapshot()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> AuthPhase {
        self.inner.machine.lock().unwrap().phase
    }

    /// Subscribe to phase changes.
    ///
    /// A gate showing a pending placeholder re-evaluates off this channel
    /// when validation settles, without user interaction.
    pub fn subscribe(&self) -> watch::Receiver<AuthPhase> {
        self.inner.phase_tx.subscribe()
    }

    /// Wait until the machine has settled, returning the snapshot.
    ///
    /// Call [`AuthState::initialize`] first; an uninitialized machine with
    /// no validation in flight never settles.
    pub async fn settled(&self) -> AuthSnapshot {
        let mut rx = self.subscribe();
        match rx.wait_for(|phase| phase.is_settled()).await {
            Ok(phase) => phase.snapshot(),
            Err(_) => self.snapshot(),
        }
    }

    /// Establish a session from a freshly issued token.
    ///
    /// Optimistic: the token was just issued by a trusted login call, so the
    /// store is written and the phase flips to `Authenticated` synchronously
    /// with no re-validation round-trip.
    pub fn login(&self, token: Token) {
        self.inner.store.set(&token);
        let mut machine = self.inner.machine.lock().unwrap();
        machine.generation += 1;
        machine.phase = AuthPhase::Authenticated;
        let _ = self.inner.phase_tx.send(machine.phase);
        info!("session established");
    }

    /// Drop the session. Idempotent.
    pub fn logout(&self) {
        self.inner.store.clear();
        let mut machine = self.inner.machine.lock().unwrap();
        machine.generation += 1;
        machine.phase = AuthPhase::Unauthenticated;
        let _ = self.inner.phase_tx.send(machine.phase);
        info!("session dropped");
    }

    /// Validate the held token against the backend.
    ///
    /// Concurrent calls coalesce into one in-flight check; every caller
    /// observes the same answer. With no held token this settles to
    /// `Unauthenticated` without a backend call.
    pub async fn validate_now(&self) -> bool {
        let Some(token) = self.inner.store.get() else {
            self.force_phase(AuthPhase::Unauthenticated);
            return false;
        };

        let mut rx = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            if let Some(rx) = inflight.as_ref() {
                rx.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                *inflight = Some(rx.clone());

                let generation = self.begin_validation();
                let state = self.clone();
                tokio::spawn(async move {
                    let valid = state.inner.validator.validate(&token).await;
                    // Release the slot before fanning out, so a caller
                    // arriving after this result starts a fresh check.
                    state.inner.inflight.lock().unwrap().take();
                    state.finish_validation(generation, valid);
                    let _ = tx.send(Some(valid));
                });
                rx
            }
        };

        match rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).unwrap_or(false),
            Err(_) => false,
        }
    }

    fn begin_validation(&self) -> u64 {
        let mut machine = self.inner.machine.lock().unwrap();
        machine.phase = AuthPhase::Validating;
        let _ = self.inner.phase_tx.send(machine.phase);
        machine.generation
    }

    fn finish_validation(&self, generation: u64, valid: bool) {
        let mut machine = self.inner.machine.lock().unwrap();
        if machine.generation != generation {
            // login/logout happened while the check was in flight
            debug!("discarding stale validation result");
            return;
        }
        machine.phase = if valid {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        };
        let _ = self.inner.phase_tx.send(machine.phase);
    }

    fn force_phase(&self, phase: AuthPhase) {
        let mut machine = self.inner.machine.lock().unwrap();
        machine.phase = phase;
        let _ = self.inner.phase_tx.send(machine.phase);
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
