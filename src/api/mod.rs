//! Client side of the library REST API

pub mod client;

use serde::Deserialize;

pub use client::ApiClient;

/// `{ data: T }` envelope used by read endpoints
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{ message }` body returned by mutating endpoints
#[derive(Debug, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Token returned by credential login (`{ data: { token } }`)
#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub token: String,
}

/// Token returned by federated login (`{ token }`)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    #[test]
    fn test_data_envelope() {
        let body = r#"{"data":[{"id":"1","name":"ann","email":"a@b.c","role":"admin","is_deleted":true}]}"#;
        let parsed: DataResponse<Vec<User>> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert!(parsed.data[0].is_deleted);
    }

    #[test]
    fn test_login_envelope() {
        let parsed: DataResponse<TokenData> = serde_json::from_str(r#"{"data":{"token":"abc"}}"#).unwrap();
        assert_eq!(parsed.data.token, "abc");
    }
}
