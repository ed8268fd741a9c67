//! User model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lowercase letters and whitespace only
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z\s]+$").expect("valid name regex"));

/// Account role carried in the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// Path a session with this role is sent to after login
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Member => "/home",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Role information decoded from a session token.
///
/// Only `role` is required; the remaining claims are informational and are
/// never trusted for access decisions beyond page selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub role: Role,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// User as listed by `GET /users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_deleted: bool,
}

impl User {
    pub fn status_label(&self) -> &'static str {
        if self.is_deleted {
            "Inactive"
        } else {
            "Active"
        }
    }
}

/// Credentials login form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide a valid email."))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters."))]
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterUser {
    #[validate(regex(path = *NAME_RE, message = "Name must be in lowercase only"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
}

impl RegisterUser {
    /// Build the form, normalizing the name to trimmed lowercase
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: normalize_name(name),
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// Admin update of a user account
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateUser {
    #[validate(regex(path = *NAME_RE, message = "Name must be in lowercase only"))]
    pub name: String,
    #[validate(email(message = "Email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub is_deleted: bool,
    pub role: Role,
}

impl UpdateUser {
    /// Start an update from the current record; role and status are kept as-is
    pub fn from_user(user: &User, name: &str, email: &str, password: &str) -> Self {
        Self {
            name: normalize_name(name),
            email: email.to_string(),
            password: password.to_string(),
            is_deleted: user.is_deleted,
            role: user.role,
        }
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
