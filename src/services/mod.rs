//! Client-side services over the library API

pub mod auth;
pub mod books;
pub mod categories;
pub mod rentals;
pub mod stats;
pub mod users;

use crate::{api::ApiClient, session::SessionContext};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub categories: categories::CategoriesService,
    pub rentals: rentals::RentalsService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services sharing one HTTP client
    pub fn new(api: ApiClient, session: SessionContext, google_client_id: Option<String>) -> Self {
        let users = users::UsersService::new(api.clone());
        let books = books::BooksService::new(api.clone());
        let rentals = rentals::RentalsService::new(api.clone());

        Self {
            auth: auth::AuthService::new(api.clone(), session, google_client_id),
            stats: stats::StatsService::new(users.clone(), books.clone(), rentals.clone()),
            categories: categories::CategoriesService::new(api),
            users,
            books,
            rentals,
        }
    }
}
