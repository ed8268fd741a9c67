//! Library Client
//!
//! Client-side core of the library management front end: session handling,
//! role-based route guarding, paginated lists and confirmed mutations over
//! the library REST API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod list;
pub mod models;
pub mod mutation;
pub mod routing;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use session::{FileSessionStore, SessionContext, SessionStore};

/// Application state shared by every page and command
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: SessionContext,
    pub guard: routing::RouteGuard,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state with the file-backed session store from the configuration
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session.path.clone()));
        Self::with_store(config, store)
    }

    /// Build the state around an explicit session store
    pub fn with_store(config: AppConfig, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let session = SessionContext::new(store);
        let api = api::ApiClient::new(&config.api)?;

        Ok(Self {
            guard: routing::RouteGuard::new(session.clone()),
            services: Arc::new(services::Services::new(
                api,
                session.clone(),
                config.google.client_id.clone(),
            )),
            session,
            config: Arc::new(config),
        })
    }
}
