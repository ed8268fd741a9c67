//! Data models for the library client

pub mod book;
pub mod category;
pub mod rental;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookForm};
pub use category::{Category, CategoryForm};
pub use rental::{CreateRental, Rental};
pub use user::{IdentityClaim, LoginRequest, RegisterUser, Role, UpdateUser, User};
