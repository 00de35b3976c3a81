//! Bearer token type and storage.

use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// An opaque bearer credential for the conversion service.
///
/// Issued by a successful login and destroyed by logout or a failed
/// validation. The toolkit never inspects its contents.
///
/// # Security
///
/// Never logged or displayed in Debug output. Treat as opaque.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Create a new token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing requests. Never log this value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}

/// Process-wide slot holding zero or one session token.
///
/// `set` and `clear` take effect synchronously: a subsequent `get`, from any
/// component, observes the new value. The store is the single durable piece
/// of client state; all writes funnel through the session state machine.
pub trait TokenStore: Send + Sync {
    /// Returns the held token, if any.
    fn get(&self) -> Option<Token>;

    /// Replace the held token.
    fn set(&self, token: &Token);

    /// Drop the held token. A no-op when the slot is already empty.
    fn clear(&self);
}

/// In-memory token store.
///
/// Used by tests and by embedders that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<Token>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<Token> {
        self.slot.read().unwrap().clone()
    }

    fn set(&self, token: &Token) {
        *self.slot.write().unwrap() = Some(token.clone());
    }

    fn clear(&self) {
        *self.slot.write().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hides_value_in_debug() {
        let token = Token::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("eyJ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn set_is_immediately_visible() {
        let store = MemoryTokenStore::new();
        assert!(store.get().is_none());

        store.set(&Token::new("abc"));
        assert_eq!(store.get().unwrap().as_str(), "abc");
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = MemoryTokenStore::new();
        store.set(&Token::new("abc"));
        store.clear();
        assert!(store.get().is_none());

        // clearing an empty slot stays empty
        store.clear();
        assert!(store.get().is_none());
    }
}
