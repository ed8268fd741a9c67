//! Rental listing and member rentals

use async_trait::async_trait;
use reqwest::Method;

use crate::{
    api::ApiClient,
    error::AppResult,
    list::ListSource,
    models::rental::{CreateRental, Rental},
    session::Session,
};

#[derive(Clone)]
pub struct RentalsService {
    api: ApiClient,
}

impl RentalsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, session: &Session) -> AppResult<Vec<Rental>> {
        self.api.get_data("rentals", session).await
    }

    /// Rent a single book for the logged-in member
    pub async fn rent(&self, session: &Session, book_id: &str) -> AppResult<String> {
        let body = CreateRental {
            books_ids: vec![book_id.to_string()],
        };
        self.api
            .mutate(Method::POST, "rentals/create", session, &body)
            .await
    }
}

#[async_trait]
impl ListSource<Rental> for RentalsService {
    async fn fetch(&self, session: &Session) -> AppResult<Vec<Rental>> {
        self.list(session).await
    }
}
