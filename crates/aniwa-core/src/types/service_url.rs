//! Conversion service URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL for the conversion service.
///
/// This type ensures the URL is absolute, uses HTTPS (or HTTP for loopback
/// hosts), and is normalized for endpoint construction.
///
/// # Example
///
/// ```
/// use aniwa_core::ServiceUrl;
///
/// let service = ServiceUrl::new("https://api.aniwa.dev").unwrap();
/// assert_eq!(service.endpoint_url("/api/user/auth/"),
///            "https://api.aniwa.dev/api/user/auth/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServiceUrl(Url);

impl ServiceUrl {
    /// Create a new service URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ServiceUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        // Normalize: remove trailing slash
        let normalized = if url.path() == "/" {
            let mut u = url.clone();
            u.set_path("");
            u
        } else {
            url
        };

        Ok(Self(normalized))
    }

    /// Returns the HTTP URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        // The URL crate always adds a trailing slash to root paths,
        // so trim before joining the endpoint path
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// Returns the WebSocket URL for a path (query string included).
    ///
    /// `https` becomes `wss`, `http` becomes `ws`.
    pub fn ws_url(&self, path_and_query: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{}{}", ws_base, path_and_query)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        // Must be absolute
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for loopback)
        let scheme = url.scheme();
        let is_loopback = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "::1");

        if scheme != "https" && !(scheme == "http" && is_loopback) {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for loopback)".to_string(),
            }
            .into());
        }

        // Must have a host
        if url.host_str().is_none() {
            return Err(InvalidInputError::ServiceUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServiceUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ServiceUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ServiceUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for ServiceUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let service = ServiceUrl::new("https://api.aniwa.dev").unwrap();
        assert_eq!(service.host(), Some("api.aniwa.dev"));
    }

    #[test]
    fn valid_loopback_http() {
        let service = ServiceUrl::new("http://localhost:8000").unwrap();
        assert_eq!(service.host(), Some("localhost"));
    }

    #[test]
    fn endpoint_url_construction() {
        let service = ServiceUrl::new("https://api.aniwa.dev/").unwrap();
        assert_eq!(
            service.endpoint_url("/api/user/auth/"),
            "https://api.aniwa.dev/api/user/auth/"
        );
    }

    #[test]
    fn ws_url_swaps_scheme() {
        let service = ServiceUrl::new("https://api.aniwa.dev").unwrap();
        assert_eq!(
            service.ws_url("/ws/progress/?token=abc"),
            "wss://api.aniwa.dev/ws/progress/?token=abc"
        );

        let local = ServiceUrl::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(
            local.ws_url("/ws/progress/?token=abc"),
            "ws://127.0.0.1:8000/ws/progress/?token=abc"
        );
    }

    #[test]
    fn invalid_http_non_loopback() {
        assert!(ServiceUrl::new("http://api.aniwa.dev").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ServiceUrl::new("/api/user/auth/").is_err());
    }
}
