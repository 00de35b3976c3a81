//! Mock backend tests for the aniwa client.
//!
//! These tests use wiremock to simulate the conversion service and a
//! loopback WebSocket listener for the progress channel, exercising the
//! contract without network access or real credentials.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aniwa_client::http::ApiClient;
use aniwa_client::{AuthState, Client, ProgressStream, SessionValidator};
use aniwa_core::error::Error;
use aniwa_core::gate::{RouteDecision, RouteGate};
use aniwa_core::token::{MemoryTokenStore, Token, TokenStore};
use aniwa_core::traits::{TokenValidator, UnauthorizedHook};
use aniwa_core::{Credentials, ServiceUrl};

/// Helper to build a service URL from a mock server.
fn mock_service_url(server: &MockServer) -> ServiceUrl {
    ServiceUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/auth/"))
        .and(body_json(json!({
            "username": "alice",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token"
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let token = client
        .login(&Credentials::new("alice", "secret123"))
        .await
        .unwrap();

    assert_eq!(token.as_str(), "issued-token");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/auth/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let result = client.login(&Credentials::new("bad", "wrongpass")).await;

    match result {
        Err(Error::Credential(e)) => {
            assert!(e.to_string().contains("Invalid username or password"));
        }
        other => panic!("expected credential error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_login_unexpected_body_fails_closed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "unexpected": true
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let result = client.login(&Credentials::new("alice", "secret")).await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_register_rejection_surfaces_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "username already taken"
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let result = client.register("alice", "alice@example.com", "pw").await;

    match result {
        Err(Error::Credential(e)) => assert!(e.to_string().contains("username already taken")),
        other => panic!("expected credential error, got {:?}", other.map(|_| ())),
    }
}

// ============================================================================
// Validator Tests
// ============================================================================

fn validator_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> SessionValidator {
    SessionValidator::new(ApiClient::new(mock_service_url(server)), store)
}

#[tokio::test]
async fn test_validator_accepts_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate-token"))
        .and(header("authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let token = Token::new("live-token");
    store.set(&token);

    let validator = validator_for(&server, store.clone());
    assert!(validator.validate(&token).await);
    // an accepted token is retained
    assert!(store.get().is_some());
}

#[tokio::test]
async fn test_validator_rejection_clears_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let token = Token::new("dead-token");
    store.set(&token);

    let validator = validator_for(&server, store.clone());
    assert!(!validator.validate(&token).await);
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_validator_unreachable_backend_clears_store() {
    // Bind a server only to learn a free port, then shut it down.
    let server = MockServer::start().await;
    let service = mock_service_url(&server);
    drop(server);

    let store = Arc::new(MemoryTokenStore::new());
    let token = Token::new("any-token");
    store.set(&token);

    let validator = SessionValidator::new(ApiClient::new(service), store.clone());
    assert!(!validator.validate(&token).await);
    assert!(store.get().is_none());
}

// ============================================================================
// Session Machine Tests
// ============================================================================

#[tokio::test]
async fn test_coalesced_validations_hit_backend_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate-token"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(&Token::new("shared-token"));
    let validator = validator_for(&server, store.clone());
    let auth = AuthState::new(store, Arc::new(validator));

    // two guarded routes mounting at once
    let (a, b) = tokio::join!(auth.validate_now(), auth.validate_now());

    assert!(a);
    assert!(b);
    assert!(auth.snapshot().is_authenticated);
    server.verify().await;
}

#[tokio::test]
async fn test_startup_with_valid_token_settles_authenticated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate-token"))
        .and(header("authorization", "Bearer restored-token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(&Token::new("restored-token"));
    let validator = validator_for(&server, store.clone());
    let auth = AuthState::new(store, Arc::new(validator));
    let gate = RouteGate::default();

    auth.initialize();
    let snapshot = auth.settled().await;

    assert!(snapshot.is_authenticated);
    assert_eq!(gate.decide(snapshot, true), RouteDecision::Render);
}

#[tokio::test]
async fn test_startup_with_rejected_token_redirects() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/validate-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(&Token::new("expired-token"));
    let validator = validator_for(&server, store.clone());
    let auth = AuthState::new(store.clone(), Arc::new(validator));
    let gate = RouteGate::default();

    auth.initialize();
    let snapshot = auth.settled().await;

    assert!(!snapshot.is_authenticated);
    assert!(store.get().is_none());
    assert_eq!(
        gate.decide(snapshot, true),
        RouteDecision::RedirectTo("/login".to_string())
    );
}

// ============================================================================
// 401 Policy Hook
// ============================================================================

struct FlagHook(AtomicBool);

impl UnauthorizedHook for FlagHook {
    fn on_unauthorized(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_unauthorized_hook_fires_on_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gan/gallery/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let hook = Arc::new(FlagHook(AtomicBool::new(false)));
    let client = Client::with_unauthorized_hook(mock_service_url(&server), hook.clone());

    let result = client.gallery(&Token::new("stale")).await;
    assert!(result.is_err());
    assert!(hook.0.load(Ordering::SeqCst));
}

// ============================================================================
// Media Operation Tests
// ============================================================================

#[tokio::test]
async fn test_generate_returns_media_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/gan/generate-video/"))
        .and(header("authorization", "Bearer upload-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "media_url": "https://cdn.aniwa.dev/outputs/42.mp4",
            "media_type": "video"
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let result = client
        .generate(
            &Token::new("upload-token"),
            "clip.mp4",
            "video/mp4",
            vec![0u8; 64],
        )
        .await
        .unwrap();

    assert_eq!(result.media_url, "https://cdn.aniwa.dev/outputs/42.mp4");
    assert_eq!(result.media_type.as_deref(), Some("video"));
}

#[tokio::test]
async fn test_gallery_lists_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/gan/gallery/"))
        .and(header("authorization", "Bearer gallery-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "media": [
                {
                    "id": 1,
                    "media_url": "https://cdn.aniwa.dev/outputs/1.png",
                    "media_type": "image",
                    "created_at": "2026-08-01T12:00:00Z"
                },
                {
                    "id": 2,
                    "media_url": "https://cdn.aniwa.dev/outputs/2.mp4",
                    "media_type": "video",
                    "created_at": "2026-08-02T09:30:00Z"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    let entries = client.gallery(&Token::new("gallery-token")).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].media_type, "image");
    assert_eq!(entries[1].media_url, "https://cdn.aniwa.dev/outputs/2.mp4");
}

#[tokio::test]
async fn test_save_media() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/gan/save-media/"))
        .and(body_json(json!({
            "media_url": "https://cdn.aniwa.dev/outputs/42.mp4"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "saved"
        })))
        .mount(&server)
        .await;

    let client = Client::new(mock_service_url(&server));
    client
        .save_media(&Token::new("t"), "https://cdn.aniwa.dev/outputs/42.mp4")
        .await
        .unwrap();
}

// ============================================================================
// Progress Channel Tests
// ============================================================================

/// Spawn a loopback WebSocket listener pushing the given progress values.
async fn spawn_progress_server(frames: Vec<i64>, abrupt_drop: bool) -> ServiceUrl {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        for progress in frames {
            ws.send(Message::text(format!("{{\"progress\":{progress}}}")))
                .await
                .unwrap();
        }

        if abrupt_drop {
            // terminate without a close handshake
            drop(ws);
        } else {
            // drain until the client closes
            while let Some(Ok(_)) = ws.next().await {}
        }
    });

    ServiceUrl::new(format!("http://127.0.0.1:{port}")).unwrap()
}

#[tokio::test]
async fn test_progress_channel_completes_at_one_hundred() {
    let service = spawn_progress_server(vec![45, 100], false).await;

    let mut stream = ProgressStream::open(&service, &Token::new("upload-token"))
        .await
        .unwrap();

    let mut uploading = true;
    let mut last_percent = 0;
    while let Some(event) = stream.next().await {
        let event = event.unwrap();
        last_percent = event.percent;
        if event.is_done() {
            uploading = false;
        }
    }

    assert!(!uploading);
    assert_eq!(last_percent, 100);
}

#[tokio::test]
async fn test_progress_channel_reports_drop_once() {
    let service = spawn_progress_server(vec![45], true).await;

    let mut stream = ProgressStream::open(&service, &Token::new("upload-token"))
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.percent, 45);

    // exactly one error item, then termination
    let second = stream.next().await.unwrap();
    assert!(matches!(second, Err(Error::Channel(_))));
    assert!(stream.next().await.is_none());
}
