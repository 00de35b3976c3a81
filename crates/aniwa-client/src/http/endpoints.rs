//! Backend endpoint definitions and request/response types.
//!
//! Every response body passes through one of the declared structs here;
//! anything that fails to deserialize is treated as a transport failure
//! rather than leaking an undeclared shape into session state.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST: exchange credentials for a bearer token.
pub const AUTH: &str = "/api/user/auth/";

/// POST: create an account.
pub const REGISTER: &str = "/api/user/register/";

/// POST: drop the server-side session.
pub const LOGOUT: &str = "/api/user/logout/";

/// GET: check whether the bearer token is still accepted.
pub const VALIDATE_TOKEN: &str = "/api/auth/validate-token";

/// POST (multipart): submit a file for anime-style conversion.
pub const GENERATE: &str = "/api/gan/generate-video/";

/// POST: persist a generated result to the user's gallery.
pub const SAVE_MEDIA: &str = "/api/gan/save-media/";

/// GET: list past outputs.
pub const GALLERY: &str = "/api/gan/gallery/";

/// WebSocket path pushing conversion progress frames.
pub const PROGRESS_WS: &str = "/ws/progress/";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for auth.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from auth.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
}

/// Request body for register.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from generate.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub media_url: String,
    #[serde(default)]
    pub media_type: Option<String>,
}

/// Request body for save-media.
#[derive(Debug, Serialize)]
pub struct SaveMediaRequest<'a> {
    pub media_url: &'a str,
}

/// Response from gallery.
#[derive(Debug, Deserialize)]
pub struct GalleryResponse {
    pub media: Vec<GalleryEntry>,
}

/// A single gallery item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub id: i64,
    pub media_url: String,
    pub media_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A progress frame pushed over the WebSocket channel.
#[derive(Debug, Deserialize)]
pub struct ProgressFrame {
    pub progress: i64,
}

/// Backend error response format. Django-style `detail` is accepted as the
/// message field.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: Option<String>,
    #[serde(alias = "detail")]
    pub message: Option<String>,
}
