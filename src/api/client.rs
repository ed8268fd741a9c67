//! HTTP client for the library REST API

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, multipart::Form, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use super::{DataResponse, MessageResponse};
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    session::Session,
};

/// Thin wrapper over `reqwest::Client` bound to the API base URL.
///
/// Protected calls take the session explicitly; nothing here reads the
/// session store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("library-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match session {
            Some(session) => builder.header(AUTHORIZATION, session.bearer()),
            None => builder,
        }
    }

    /// `GET` a `{ data: T }` envelope
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str, session: &Session) -> AppResult<T> {
        let envelope: DataResponse<T> = self
            .send_json(self.request(Method::GET, path, Some(session)))
            .await?;
        Ok(envelope.data)
    }

    /// Send a JSON body and decode the JSON response
    pub async fn send_body<B, T>(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: &B,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(method, path, session).json(body)).await
    }

    /// Send a form-urlencoded body and decode the JSON response
    pub async fn send_form<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path, None).form(body)).await
    }

    /// Send a JSON body to a mutating endpoint and return its message
    pub async fn mutate<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: &B,
    ) -> AppResult<String> {
        self.send_message(self.request(method, path, Some(session)).json(body))
            .await
    }

    /// Bodyless mutation (delete, restore)
    pub async fn mutate_empty(&self, method: Method, path: &str, session: &Session) -> AppResult<String> {
        let builder = self.request(method.clone(), path, Some(session));
        // Restore endpoints expect an empty JSON object
        let builder = if method == Method::PUT {
            builder.json(&serde_json::json!({}))
        } else {
            builder
        };
        self.send_message(builder).await
    }

    /// Multipart mutation (book create/update with optional cover image)
    pub async fn mutate_multipart(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        form: Form,
    ) -> AppResult<String> {
        self.send_message(self.request(method, path, Some(session)).multipart(form))
            .await
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let body = self.send_raw(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_message(&self, builder: RequestBuilder) -> AppResult<String> {
        let body = self.send_raw(builder).await?;
        if body.trim().is_empty() {
            return Ok(String::new());
        }
        let response: MessageResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(response.message)
    }

    async fn send_raw(&self, builder: RequestBuilder) -> AppResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "API request failed");
            return Err(AppError::from_response(status, &body));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let config = ApiConfig {
            base_url: "http://localhost:3000/api/v1/".to_string(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api/v1");
        assert_eq!(client.url("/users/"), "http://localhost:3000/api/v1/users/");
        assert_eq!(client.url("books/delete/7"), "http://localhost:3000/api/v1/books/delete/7");
    }

    #[test]
    fn test_protected_request_carries_bearer() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();
        let session = Session::new("abc.def.ghi");

        let request = client
            .request(Method::DELETE, "users/delete/u1", Some(&session))
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:3000/api/v1/users/delete/u1");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc.def.ghi");
    }

    #[test]
    fn test_public_request_has_no_authorization() {
        let client = ApiClient::new(&ApiConfig::default()).unwrap();

        let request = client
            .request(Method::POST, "users/login", None)
            .json(&serde_json::json!({ "email": "a@b.c", "password": "secret" }))
            .build()
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
    }
}
