//! Rental (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Borrower summary embedded in a rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Book summary embedded in a rental
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalBook {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub code_book: String,
}

/// Rental as returned by `GET /rentals`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    pub id: String,
    #[serde(default)]
    pub user: Option<RentalUser>,
    #[serde(default)]
    pub books: Vec<RentalBook>,
    pub rental_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
    pub status: String,
}

impl Rental {
    pub fn borrower_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("Unknown")
    }

    pub fn borrower_email(&self) -> &str {
        self.user.as_ref().map(|u| u.email.as_str()).unwrap_or("Unknown")
    }

    pub fn return_label(&self) -> String {
        self.return_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "Not Returned".to_string())
    }
}

/// Create rental request
#[derive(Debug, Clone, Serialize)]
pub struct CreateRental {
    pub books_ids: Vec<String>,
}
