//! Durable token storage for the CLI.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use aniwa_core::token::{Token, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data. Exactly one durable item: the bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
}

/// Token store backed by a JSON file in the platform data directory.
///
/// Survives process restarts; destroyed only by `clear`. Writes are
/// best-effort: persistence failures are logged, not surfaced, so the
/// in-session flow keeps working.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs =
            ProjectDirs::from("", "", "aniwa").context("Could not determine config directory")?;

        let data_dir = dirs.data_dir();
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;

        Ok(Self {
            path: data_dir.join("session.json"),
        })
    }

    /// Open the store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<Token> {
        let json = fs::read_to_string(&self.path).ok()?;
        let stored: StoredSession = serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, "invalid session file"))
            .ok()?;
        Some(Token::new(stored.access_token))
    }

    fn set(&self, token: &Token) {
        let stored = StoredSession {
            access_token: token.as_str().to_string(),
        };
        let json = match serde_json::to_string_pretty(&stored) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize session");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, &json) {
            warn!(error = %e, "failed to write session file");
            return;
        }

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        if let Ok(metadata) = fs::metadata(&self.path) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(error = %e, "failed to remove session file");
            }
        }
    }
}
