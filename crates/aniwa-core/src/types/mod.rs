//! Validated wire-adjacent types.

mod service_url;

pub use service_url::ServiceUrl;
