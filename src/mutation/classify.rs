//! Maps failed mutations onto user-facing messages

use crate::error::AppError;

use super::action::Entity;

/// Known business failures reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    AlreadyDeleted,
    AdminProtected,
    DuplicateName,
    DuplicateEmail,
    OutOfStock,
    Unknown,
}

impl FailureKind {
    fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "ALREADY_DELETED" => Some(FailureKind::AlreadyDeleted),
            "ADMIN_PROTECTED" => Some(FailureKind::AdminProtected),
            "DUPLICATE_NAME" => Some(FailureKind::DuplicateName),
            "DUPLICATE_EMAIL" => Some(FailureKind::DuplicateEmail),
            "OUT_OF_STOCK" => Some(FailureKind::OutOfStock),
            _ => None,
        }
    }

    // The backend only exposes free-text messages; these fragments track its wording.
    fn from_message(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("already deleted") {
            FailureKind::AlreadyDeleted
        } else if message.contains("can't update admin") {
            FailureKind::AdminProtected
        } else if message.contains("name already registered") {
            FailureKind::DuplicateName
        } else if message.contains("email already registered") {
            FailureKind::DuplicateEmail
        } else if message.contains("out of stock") {
            FailureKind::OutOfStock
        } else {
            FailureKind::Unknown
        }
    }

    /// Form field a failure belongs to, when it is shown inline
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FailureKind::DuplicateName => Some("name"),
            FailureKind::DuplicateEmail => Some("email"),
            _ => None,
        }
    }

    /// Text shown to the user for a known failure
    pub fn message(&self, entity: Entity) -> Option<String> {
        let text = match self {
            FailureKind::AlreadyDeleted => format!("{} status inactive", entity.label()),
            FailureKind::AdminProtected => "You can't update admin as admin".to_string(),
            FailureKind::DuplicateName => "This name is already registered".to_string(),
            FailureKind::DuplicateEmail => "This email is already registered".to_string(),
            FailureKind::OutOfStock => "Book is out of stock".to_string(),
            FailureKind::Unknown => return None,
        };
        Some(text)
    }
}

/// Classify an error: structured code first, message fragments second
pub fn classify(err: &AppError) -> FailureKind {
    if let Some(kind) = err.server_code().and_then(FailureKind::from_code) {
        return kind;
    }
    err.server_message()
        .map(FailureKind::from_message)
        .unwrap_or(FailureKind::Unknown)
}
