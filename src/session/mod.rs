//! Session persistence and identity resolution
//!
//! The session is a single bearer token persisted under the `token` key.
//! Nothing here verifies the token signature: the role decoded from it only
//! selects which pages render, and every protected API call is re-checked by
//! the server.
//!
//! Several processes sharing the same session file race on it without any
//! coordination; the last writer wins.

pub mod file;
pub mod memory;
pub mod resolver;

use std::fmt;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::user::IdentityClaim;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use resolver::RoleResolver;

/// Key under which the token is persisted
pub const TOKEN_KEY: &str = "token";

/// Opaque bearer token of a logged-in user
#[derive(Clone, PartialEq, Eq)]
pub struct Session(String);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(<redacted>)")
    }
}

/// Persisted credential storage
pub trait SessionStore: Send + Sync {
    /// Current session, if any. No side effects.
    fn get(&self) -> Option<Session>;

    /// Store a token, replacing any existing one
    fn set(&self, token: &str) -> AppResult<()>;

    /// Remove the token. Clearing an empty store is a no-op.
    fn clear(&self) -> AppResult<()>;
}

/// Explicit session handle passed to the route guard and to API callers
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    resolver: RoleResolver,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            resolver: RoleResolver::new(),
        }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn session(&self) -> Option<Session> {
        self.store.get()
    }

    /// Decode the current session; an undecodable token clears the store
    pub fn identity(&self) -> Option<IdentityClaim> {
        self.resolver.resolve(self.store.as_ref())
    }

    /// Session for an API call, or an authentication error when logged out
    pub fn require_session(&self) -> AppResult<Session> {
        self.store
            .get()
            .ok_or_else(|| AppError::Authentication("No active session".to_string()))
    }

    /// Persist a freshly issued token and return the identity it carries.
    ///
    /// A token that does not decode is not kept.
    pub fn establish(&self, token: &str) -> AppResult<IdentityClaim> {
        self.store.set(token)?;
        self.identity()
            .ok_or_else(|| AppError::Session("Received token could not be decoded".to_string()))
    }

    pub fn invalidate(&self) -> AppResult<()> {
        self.store.clear()
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub fn token_with_claims(claims: serde_json::Value) -> String {
        encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-secret")).unwrap()
    }

    pub fn token_for_role(role: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        token_with_claims(json!({ "id": "u1", "email": "a@b.c", "role": role, "exp": exp }))
    }
}
