//! HTTP layer: client wrapper and endpoint contract.

mod client;
pub mod endpoints;

pub use client::ApiClient;
pub(crate) use client::transport;
