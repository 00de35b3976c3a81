//! High-level operations against the conversion service.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

use aniwa_core::credentials::Credentials;
use aniwa_core::error::{CredentialError, Error};
use aniwa_core::token::Token;
use aniwa_core::traits::UnauthorizedHook;
use aniwa_core::types::ServiceUrl;

use crate::http::endpoints::{
    AUTH, AuthRequest, AuthResponse, GALLERY, GENERATE, GalleryEntry, GalleryResponse,
    GenerateResponse, LOGOUT, REGISTER, RegisterRequest, SAVE_MEDIA, SaveMediaRequest,
};
use crate::http::{ApiClient, transport};
use crate::progress::ProgressStream;

/// A generated result returned by the conversion endpoint.
#[derive(Clone, Debug)]
pub struct GeneratedMedia {
    /// Where the converted output can be fetched.
    pub media_url: String,
    /// "image" or "video", when the backend reports it.
    pub media_type: Option<String>,
}

/// Client for the conversion service.
///
/// Thin wrapper over [`ApiClient`] exposing the backend contract as typed
/// operations. Credential rejections surface as [`CredentialError`] with the
/// server's message; everything else follows the transport/API taxonomy.
#[derive(Clone, Debug)]
pub struct Client {
    http: ApiClient,
}

impl Client {
    /// Create a client for the given service.
    pub fn new(service: ServiceUrl) -> Self {
        Self {
            http: ApiClient::new(service),
        }
    }

    /// Create a client with an injected 401 policy hook.
    pub fn with_unauthorized_hook(
        service: ServiceUrl,
        unauthorized: Arc<dyn UnauthorizedHook>,
    ) -> Self {
        Self {
            http: ApiClient::with_unauthorized_hook(service, unauthorized),
        }
    }

    /// Returns the service URL this client talks to.
    pub fn service(&self) -> &ServiceUrl {
        self.http.service()
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the backend rejects the credentials,
    /// a transport error when it is unreachable.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Token, Error> {
        info!("logging in");

        let request = AuthRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response: AuthResponse = self
            .http
            .post_json(AUTH, &request)
            .await
            .map_err(|e| credential_rejection(e, "invalid username or password"))?;

        debug!("login accepted");
        Ok(Token::new(response.access_token))
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the backend rejects the registration.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), Error> {
        info!("registering account");

        let request = RegisterRequest {
            username,
            email,
            password,
        };

        let _: serde_json::Value = self
            .http
            .post_json(REGISTER, &request)
            .await
            .map_err(|e| credential_rejection(e, "registration rejected"))?;

        Ok(())
    }

    /// Drop the server-side session. Best-effort; local state is the
    /// caller's concern.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &Token) -> Result<(), Error> {
        self.http.post_authed_no_response(LOGOUT, token).await
    }

    /// Submit a file for anime-style conversion.
    ///
    /// The payload travels over this request; progress telemetry arrives
    /// separately on the channel opened by [`Client::progress`].
    #[instrument(skip(self, token, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn generate(
        &self,
        token: &Token,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<GeneratedMedia, Error> {
        info!("submitting file for conversion");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(transport)?;
        let form = Form::new().part("file", part);

        let response: GenerateResponse =
            self.http.post_multipart_authed(GENERATE, form, token).await?;

        Ok(GeneratedMedia {
            media_url: response.media_url,
            media_type: response.media_type,
        })
    }

    /// Persist a generated result to the user's gallery.
    #[instrument(skip(self, token))]
    pub async fn save_media(&self, token: &Token, media_url: &str) -> Result<(), Error> {
        let request = SaveMediaRequest { media_url };
        let _: serde_json::Value = self
            .http
            .post_json_authed(SAVE_MEDIA, &request, token)
            .await?;
        Ok(())
    }

    /// List the user's past outputs.
    #[instrument(skip(self, token))]
    pub async fn gallery(&self, token: &Token) -> Result<Vec<GalleryEntry>, Error> {
        let response: GalleryResponse = self.http.get_authed(GALLERY, token).await?;
        Ok(response.media)
    }

    /// Open the progress channel for an upload attempt.
    pub async fn progress(&self, token: &Token) -> Result<ProgressStream, Error> {
        ProgressStream::open(self.http.service(), token).await
    }
}

/// Collapse a 4xx rejection of a user-submitted form into a credential
/// error carrying the server's message. Transport and 5xx failures pass
/// through unchanged.
fn credential_rejection(error: Error, fallback: &str) -> Error {
    match error {
        Error::Api(api) if (400..=403).contains(&api.status) => {
            let message = api
                .message
                .or(api.error)
                .unwrap_or_else(|| fallback.to_string());
            CredentialError::Rejected { message }.into()
        }
        other => other,
    }
}
