//! User administration

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use crate::{
    api::ApiClient,
    error::AppResult,
    list::ListSource,
    models::user::{UpdateUser, User},
    session::Session,
};

#[derive(Clone)]
pub struct UsersService {
    api: ApiClient,
}

impl UsersService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, session: &Session) -> AppResult<Vec<User>> {
        self.api.get_data("users/", session).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<User> {
        self.api.get_data(&format!("users/{}", id), session).await
    }

    pub async fn update(&self, session: &Session, id: &str, user: &UpdateUser) -> AppResult<String> {
        user.validate()?;
        self.api
            .mutate(Method::PUT, &format!("users/update/{}", id), session, user)
            .await
    }

    /// Soft delete; the user shows as inactive afterwards
    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<String> {
        self.api
            .mutate_empty(Method::DELETE, &format!("users/delete/{}", id), session)
            .await
    }

    pub async fn restore(&self, session: &Session, id: &str) -> AppResult<String> {
        self.api
            .mutate_empty(Method::PUT, &format!("users/restore/{}", id), session)
            .await
    }
}

#[async_trait]
impl ListSource<User> for UsersService {
    async fn fetch(&self, session: &Session) -> AppResult<Vec<User>> {
        self.list(session).await
    }
}
