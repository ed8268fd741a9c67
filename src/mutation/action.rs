//! Mutating actions, their confirmation prompts and result notices

use std::fmt;

/// Record type a mutation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    User,
    Book,
    Category,
    Rental,
}

impl Entity {
    pub fn label(&self) -> &'static str {
        match self {
            Entity::User => "User",
            Entity::Book => "Book",
            Entity::Category => "Category",
            Entity::Rental => "Rental",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Entity::User => "user",
            Entity::Book => "book",
            Entity::Category => "category",
            Entity::Rental => "rental",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    Restore,
    /// Member rents a book
    Rent,
}

impl MutationKind {
    fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::Restore => "restore",
            MutationKind::Rent => "rent",
        }
    }
}

/// Key identifying the record a mutation targets. Creates have no id yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub entity: Entity,
    pub id: Option<String>,
}

/// A user action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    pub entity: Entity,
    pub kind: MutationKind,
    pub id: Option<String>,
}

impl MutationRequest {
    pub fn create(entity: Entity) -> Self {
        Self {
            entity,
            kind: MutationKind::Create,
            id: None,
        }
    }

    pub fn update(entity: Entity, id: &str) -> Self {
        Self::on(entity, MutationKind::Update, id)
    }

    pub fn delete(entity: Entity, id: &str) -> Self {
        Self::on(entity, MutationKind::Delete, id)
    }

    pub fn restore(entity: Entity, id: &str) -> Self {
        Self::on(entity, MutationKind::Restore, id)
    }

    /// Rent the book with the given id
    pub fn rent(book_id: &str) -> Self {
        Self::on(Entity::Book, MutationKind::Rent, book_id)
    }

    fn on(entity: Entity, kind: MutationKind, id: &str) -> Self {
        Self {
            entity,
            kind,
            id: Some(id.to_string()),
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            entity: self.entity,
            id: self.id.clone(),
        }
    }

    /// Confirmation dialog for this action
    pub fn prompt(&self) -> Prompt {
        let noun = self.entity.noun();
        let (text, confirm_label) = match self.kind {
            MutationKind::Delete => ("You won't be able to revert this!".to_string(), "Yes, delete it!"),
            MutationKind::Restore => (format!("You want to restore this {}?", noun), "Yes, restore it!"),
            MutationKind::Update => (format!("You want to update this {}?", noun), "Update"),
            MutationKind::Create => (format!("You want to create this {}?", noun), "Create"),
            MutationKind::Rent => ("You want to rent this book?".to_string(), "Rental"),
        };
        Prompt {
            title: "Are you sure?".to_string(),
            text,
            confirm_label: confirm_label.to_string(),
        }
    }

    /// Notice shown after the API accepted the action
    pub fn success_notice(&self, server_message: &str) -> Notice {
        let label = self.entity.label();
        let (title, text) = match self.kind {
            MutationKind::Delete => ("Deleted!", format!("{} has been deleted.", label)),
            MutationKind::Restore => ("Restored!", format!("{} has been restored.", label)),
            MutationKind::Update => ("Updated!", format!("{} has been updated.", label)),
            MutationKind::Create => ("Created!", format!("{} has been created.", label)),
            MutationKind::Rent if !server_message.is_empty() => ("Rented!", server_message.to_string()),
            MutationKind::Rent => ("Rented!", "Rental success!".to_string()),
        };
        Notice::success(title, text)
    }

    /// Fallback notice for failures that match no known class
    pub fn generic_failure_notice(&self) -> Notice {
        Notice::error(format!("Failed to {} {}", self.kind.verb(), self.entity.noun()))
    }
}

/// Blocking confirmation dialog content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast shown once a mutation settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn success(title: &str, text: String) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            text,
        }
    }

    pub fn error(text: String) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error!".to_string(),
            text,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.title, self.text)
    }
}
