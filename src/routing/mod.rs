//! Route table and access control

pub mod guard;
pub mod routes;

pub use guard::{decide, GuardDecision, RouteGuard};
pub use routes::{Access, Page, LOGIN_PATH};
