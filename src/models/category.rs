//! Book category model

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Create/update category request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 1, message = "Please provide a valid name"))]
    pub name: String,
}
