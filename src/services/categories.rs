//! Book categories

use async_trait::async_trait;
use reqwest::Method;
use validator::Validate;

use crate::{
    api::ApiClient,
    error::AppResult,
    list::ListSource,
    models::category::{Category, CategoryForm},
    session::Session,
};

#[derive(Clone)]
pub struct CategoriesService {
    api: ApiClient,
}

impl CategoriesService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, session: &Session) -> AppResult<Vec<Category>> {
        self.api.get_data("category", session).await
    }

    pub async fn create(&self, session: &Session, category: &CategoryForm) -> AppResult<String> {
        category.validate()?;
        self.api
            .mutate(Method::POST, "category/create", session, category)
            .await
    }

    pub async fn update(&self, session: &Session, id: &str, category: &CategoryForm) -> AppResult<String> {
        category.validate()?;
        self.api
            .mutate(Method::PUT, &format!("category/update/{}", id), session, category)
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<String> {
        self.api
            .mutate_empty(Method::DELETE, &format!("category/delete/{}", id), session)
            .await
    }
}

#[async_trait]
impl ListSource<Category> for CategoriesService {
    async fn fetch(&self, session: &Session) -> AppResult<Vec<Category>> {
        self.list(session).await
    }
}
