//! Login, federated login, registration and logout

use jsonwebtoken::{decode, DecodingKey, Validation};
use reqwest::Method;
use validator::Validate;

use crate::{
    api::{ApiClient, DataResponse, MessageResponse, TokenData, TokenResponse},
    error::{AppError, AppResult},
    models::user::{IdentityClaim, LoginRequest, RegisterUser},
    session::SessionContext,
};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionContext,
    google_client_id: Option<String>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionContext, google_client_id: Option<String>) -> Self {
        Self {
            api,
            session,
            google_client_id,
        }
    }

    /// Authenticate with email and password, persisting the issued token
    pub async fn login(&self, form: &LoginRequest) -> AppResult<IdentityClaim> {
        form.validate()?;

        let response: DataResponse<TokenData> = self
            .api
            .send_body(Method::POST, "users/login", None, form)
            .await?;

        let claim = self.session.establish(&response.data.token)?;
        tracing::info!(role = %claim.role, "Logged in");
        Ok(claim)
    }

    /// Exchange a credential issued by the federated identity provider for a session
    pub async fn login_with_google(&self, credential: &str) -> AppResult<IdentityClaim> {
        if let Some(client_id) = &self.google_client_id {
            check_audience(credential, client_id)?;
        }

        let response: TokenResponse = self
            .api
            .send_form("users/login/auth/google", &[("token", credential)])
            .await?;

        let claim = self.session.establish(&response.token)?;
        tracing::info!(role = %claim.role, "Logged in with Google");
        Ok(claim)
    }

    /// Create a member account. Does not log in.
    pub async fn register(&self, form: &RegisterUser) -> AppResult<String> {
        form.validate()?;
        let response: MessageResponse = self
            .api
            .send_body(Method::POST, "users/register", None, form)
            .await?;
        Ok(response.message)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.session.invalidate()?;
        tracing::info!("Logged out");
        Ok(())
    }
}

/// Reject a Google ID token minted for another OAuth client.
///
/// The signature is left to the server, which verifies the credential again.
fn check_audience(credential: &str, client_id: &str) -> AppResult<()> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.required_spec_claims.insert("aud".to_string());
    validation.validate_exp = false;
    validation.set_audience(&[client_id]);

    decode::<serde_json::Value>(credential, &DecodingKey::from_secret(&[]), &validation)
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!("Rejected Google credential: {}", e);
            AppError::Authentication("Google credential was not issued for this client".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_tokens::token_with_claims;
    use serde_json::json;

    const CLIENT_ID: &str = "123-abc.apps.googleusercontent.com";

    #[test]
    fn test_matching_audience_accepted() {
        let credential = token_with_claims(json!({ "aud": CLIENT_ID, "email": "a@b.c" }));
        assert!(check_audience(&credential, CLIENT_ID).is_ok());
    }

    #[test]
    fn test_foreign_or_missing_audience_rejected() {
        let foreign = token_with_claims(json!({ "aud": "999-other.apps.googleusercontent.com" }));
        assert!(check_audience(&foreign, CLIENT_ID).unwrap_err().is_unauthorized());

        let missing = token_with_claims(json!({ "email": "a@b.c" }));
        assert!(check_audience(&missing, CLIENT_ID).is_err());

        assert!(check_audience("not-a-token", CLIENT_ID).is_err());
    }
}
