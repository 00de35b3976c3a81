//! HTTP client for the conversion service.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use aniwa_core::error::{ApiError, Error, TransportError};
use aniwa_core::token::Token;
use aniwa_core::traits::{NoopUnauthorizedHook, UnauthorizedHook};
use aniwa_core::types::ServiceUrl;

use super::endpoints::ApiErrorResponse;

/// HTTP client wrapping the backend contract.
///
/// Owns authorization-header construction and error parsing. A 401 on any
/// authenticated call fires the injected [`UnauthorizedHook`] so the owning
/// shell decides what rejection means; the default hook does nothing.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    service: ServiceUrl,
    unauthorized: Arc<dyn UnauthorizedHook>,
}

impl ApiClient {
    /// Create a new client for the given service with a no-op 401 hook.
    pub fn new(service: ServiceUrl) -> Self {
        Self::with_unauthorized_hook(service, Arc::new(NoopUnauthorizedHook))
    }

    /// Create a new client with an injected 401 policy hook.
    pub fn with_unauthorized_hook(
        service: ServiceUrl,
        unauthorized: Arc<dyn UnauthorizedHook>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("aniwa/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            service,
            unauthorized,
        }
    }

    /// Returns the service URL this client is configured for.
    pub fn service(&self) -> &ServiceUrl {
        &self.service
    }

    /// Make an unauthenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(service = %self.service))]
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint_url(path);
        debug!(path, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST with a JSON body.
    #[instrument(skip(self, body, token), fields(service = %self.service))]
    pub async fn post_json_authed<B, R>(
        &self,
        path: &str,
        body: &B,
        token: &Token,
    ) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.service.endpoint_url(path);
        debug!(path, "authenticated POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .headers(self.auth_headers(token))
            .send()
            .await
            .map_err(transport)?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST with no body, ignoring the response body.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub async fn post_authed_no_response(&self, path: &str, token: &Token) -> Result<(), Error> {
        let url = self.service.endpoint_url(path);
        debug!(path, "authenticated POST (no response)");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.non_success(response).await)
        }
    }

    /// Make an authenticated GET.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub async fn get_authed<R>(&self, path: &str, token: &Token) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.service.endpoint_url(path);
        debug!(path, "authenticated GET");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;

        self.handle_response(response).await
    }

    /// Make an authenticated GET where only success matters.
    #[instrument(skip(self, token), fields(service = %self.service))]
    pub async fn get_ok_authed(&self, path: &str, token: &Token) -> Result<(), Error> {
        let url = self.service.endpoint_url(path);
        debug!(path, "authenticated GET (status only)");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.non_success(response).await)
        }
    }

    /// Make an authenticated multipart POST.
    #[instrument(skip(self, form, token), fields(service = %self.service))]
    pub async fn post_multipart_authed<R>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: &Token,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.service.endpoint_url(path);
        debug!(path, "authenticated multipart POST");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;

        self.handle_response(response).await
    }

    /// Create authorization headers for authenticated requests.
    fn auth_headers(&self, token: &Token) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer(token));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Handle a response, decoding the body or parsing the error.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            // Fail closed on schema mismatch: a success body that doesn't
            // match the declared struct never enters session state.
            response.json::<R>().await.map_err(|e| {
                TransportError::Decode {
                    message: e.to_string(),
                }
                .into()
            })
        } else {
            Err(self.non_success(response).await)
        }
    }

    /// Parse a non-success response and fire the 401 hook when applicable.
    async fn non_success(&self, response: reqwest::Response) -> Error {
        let error = parse_error_response(response).await;
        if error.is_auth_error() {
            self.unauthorized.on_unauthorized();
        }
        Error::Api(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

fn bearer(token: &Token) -> HeaderValue {
    let value = format!("Bearer {}", token.as_str());
    let mut value = HeaderValue::from_str(&value).expect("invalid token characters");
    value.set_sensitive(true);
    value
}

/// Map a reqwest failure onto the transport taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

async fn parse_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();

    match response.json::<ApiErrorResponse>().await {
        Ok(body) => ApiError::new(status, body.error, body.message),
        Err(_) => ApiError::new(status, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let service = ServiceUrl::new("https://api.aniwa.dev").unwrap();
        let client = ApiClient::new(service.clone());
        assert_eq!(client.service().as_str(), service.as_str());
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let value = bearer(&Token::new("abc"));
        assert!(value.is_sensitive());
    }
}
