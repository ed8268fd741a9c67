//! Decodes the session token into an identity claim

use jsonwebtoken::{decode, DecodingKey, Validation};

use super::SessionStore;
use crate::error::{AppError, AppResult};
use crate::models::user::IdentityClaim;

/// Client-side token decoder.
///
/// The signing secret lives on the server, so the signature is not checked
/// here. Expiry is checked when the token carries an `exp` claim.
#[derive(Clone)]
pub struct RoleResolver {
    validation: Validation,
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleResolver {
    pub fn new() -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        Self { validation }
    }

    /// Decode a raw token. A claim with an unknown role fails to decode.
    pub fn decode(&self, token: &str) -> AppResult<IdentityClaim> {
        decode::<IdentityClaim>(token, &DecodingKey::from_secret(&[]), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Session(format!("Invalid session token: {}", e)))
    }

    /// Resolve the stored session.
    ///
    /// Absent and undecodable sessions both yield `None`; an undecodable one
    /// is removed from the store so the next login starts clean.
    pub fn resolve(&self, store: &dyn SessionStore) -> Option<IdentityClaim> {
        let session = store.get()?;

        match self.decode(session.token()) {
            Ok(claim) => Some(claim),
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                if let Err(clear_err) = store.clear() {
                    tracing::error!("Failed to clear session store: {}", clear_err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use crate::session::test_tokens::{token_for_role, token_with_claims};
    use crate::session::MemorySessionStore;
    use serde_json::json;

    #[test]
    fn test_resolve_absent_session() {
        let store = MemorySessionStore::new();
        assert!(RoleResolver::new().resolve(&store).is_none());
    }

    #[test]
    fn test_resolve_roles() {
        let resolver = RoleResolver::new();
        for (raw, role) in [("admin", Role::Admin), ("member", Role::Member)] {
            let store = MemorySessionStore::with_token(&token_for_role(raw));
            let claim = resolver.resolve(&store).unwrap();
            assert_eq!(claim.role, role);
            assert!(store.get().is_some());
        }
    }

    #[test]
    fn test_malformed_token_clears_store() {
        let store = MemorySessionStore::with_token("garbage");
        assert!(RoleResolver::new().resolve(&store).is_none());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_unknown_role_is_treated_as_absent() {
        let store = MemorySessionStore::with_token(&token_for_role("superuser"));
        assert!(RoleResolver::new().resolve(&store).is_none());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_expired_token_is_treated_as_absent() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let store = MemorySessionStore::with_token(&token_with_claims(json!({ "role": "admin", "exp": exp })));
        assert!(RoleResolver::new().resolve(&store).is_none());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_token_without_exp_decodes() {
        let token = token_with_claims(json!({ "role": "member" }));
        let claim = RoleResolver::new().decode(&token).unwrap();
        assert_eq!(claim.role, Role::Member);
        assert_eq!(claim.exp, None);
    }
}
