//! aniwa-client - HTTP and WebSocket client for the aniwa conversion service.
//!
//! This crate implements the networked half of the toolkit: the typed
//! backend [`Client`], the [`SessionValidator`], the reactive [`AuthState`]
//! machine, and the [`ProgressStream`] carrying upload telemetry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use aniwa_client::{AuthState, Client, SessionValidator};
//! use aniwa_client::http::ApiClient;
//! use aniwa_core::{Credentials, MemoryTokenStore, ServiceUrl};
//!
//! # async fn example() -> Result<(), aniwa_core::Error> {
//! let service = ServiceUrl::new("https://api.aniwa.dev")?;
//! let store = Arc::new(MemoryTokenStore::new());
//! let validator = SessionValidator::new(ApiClient::new(service.clone()), store.clone());
//! let auth = AuthState::new(store, Arc::new(validator));
//! auth.initialize();
//!
//! let client = Client::new(service);
//! let token = client.login(&Credentials::new("alice", "hunter2")).await?;
//! auth.login(token);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod http;
pub mod media;
pub mod progress;

// Re-export primary types at crate root for convenience
pub use auth::{AuthState, SessionValidator};
pub use media::{Client, GeneratedMedia};
pub use progress::ProgressStream;

/// Result type alias using the core Error type.
pub type Result<T> = std::result::Result<T, aniwa_core::Error>;
