//! Book model and related types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use super::category::Category;

/// Characters of description shown on a member book card before truncation
pub const DESCRIPTION_PREVIEW_LEN: usize = 150;

/// Book as returned by `GET /books` and `GET /books/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub code_book: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Server-relative image path (e.g. `/uploads/cover.png`)
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    pub fn availability_label(&self) -> &'static str {
        if self.is_available() {
            "Available"
        } else {
            "Unavailable"
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_deleted {
            "Deleted"
        } else {
            "Active"
        }
    }

    /// Description cut to the card preview length, with an ellipsis when cut
    pub fn description_preview(&self) -> String {
        if self.description.chars().count() > DESCRIPTION_PREVIEW_LEN {
            let cut: String = self.description.chars().take(DESCRIPTION_PREVIEW_LEN).collect();
            format!("{}...", cut)
        } else {
            self.description.clone()
        }
    }

    /// Absolute URL of the cover image on the given asset origin
    pub fn image_url(&self, asset_url: &str) -> Option<String> {
        self.image
            .as_ref()
            .map(|path| format!("{}{}", asset_url.trim_end_matches('/'), path))
    }
}

/// Create/update book form, sent as multipart
#[derive(Debug, Clone, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Please provide a valid code_book"))]
    pub code_book: String,
    #[validate(length(min = 1, message = "Please provide a valid title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please provide a valid author"))]
    pub author: String,
    #[validate(range(min = 0, message = "Stock must be a positive number"))]
    pub stock: i64,
    #[validate(length(min = 1, message = "Please provide a valid description"))]
    pub description: String,
    pub category_ids: Vec<String>,
    /// Local cover image to upload
    pub image: Option<PathBuf>,
}

impl BookForm {
    /// New books must start with at least one copy in stock
    pub fn validate_for_create(&self) -> Result<(), validator::ValidationErrors> {
        let mut result = self.validate();
        if self.stock == 0 {
            let mut errors = match result {
                Err(errors) => errors,
                Ok(()) => validator::ValidationErrors::new(),
            };
            let mut error = validator::ValidationError::new("range");
            error.message = Some("Stock must be a positive number".into());
            errors.add("stock", error);
            result = Err(errors);
        }
        result
    }

    /// Prefill the update form from an existing book
    pub fn from_book(book: &Book) -> Self {
        Self {
            code_book: book.code_book.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            stock: book.stock,
            description: book.description.clone(),
            category_ids: book.categories.iter().map(|c| c.id.clone()).collect(),
            image: None,
        }
    }
}
