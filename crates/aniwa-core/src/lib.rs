//! aniwa-core - Core types and traits for the aniwa client toolkit.
//!
//! This crate holds the dependency-light building blocks of the session
//! lifecycle: the bearer [`Token`] and its [`TokenStore`], the derived
//! [`AuthSnapshot`], the pure [`RouteGate`] decision function, and the
//! [`ProgressEvent`] carried by the upload progress channel. The networked
//! pieces live in `aniwa-client`.

pub mod auth;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod progress;
pub mod token;
pub mod traits;
pub mod types;

pub use auth::{AuthPhase, AuthSnapshot};
pub use credentials::Credentials;
pub use error::Error;
pub use gate::{RouteDecision, RouteGate};
pub use progress::ProgressEvent;
pub use token::{MemoryTokenStore, Token, TokenStore};
pub use traits::{NoopUnauthorizedHook, TokenValidator, UnauthorizedHook};
pub use types::ServiceUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
