//! Route table of the console

use std::fmt;

/// Login page; also where unauthenticated requests end up
pub const LOGIN_PATH: &str = "/";

/// Which gate protects a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Member,
    Admin,
}

/// Every page the console can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    MemberHome,
    BookDetail { id: String },
    Dashboard,
    Users,
    UserEdit { id: String },
    Books,
    BookCreate,
    BookEdit { id: String },
    Categories,
    Rentals,
}

impl Page {
    pub fn access(&self) -> Access {
        match self {
            Page::Login | Page::Register => Access::Public,
            Page::MemberHome | Page::BookDetail { .. } => Access::Member,
            Page::Dashboard
            | Page::Users
            | Page::UserEdit { .. }
            | Page::Books
            | Page::BookCreate
            | Page::BookEdit { .. }
            | Page::Categories
            | Page::Rentals => Access::Admin,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Page::Login => LOGIN_PATH.to_string(),
            Page::Register => "/register".to_string(),
            Page::MemberHome => "/home".to_string(),
            Page::BookDetail { id } => format!("/books/{}", id),
            Page::Dashboard => "/admin".to_string(),
            Page::Users => "/admin/users".to_string(),
            Page::UserEdit { id } => format!("/admin/users/{}", id),
            Page::Books => "/admin/books".to_string(),
            Page::BookCreate => "/admin/books/add".to_string(),
            Page::BookEdit { id } => format!("/admin/books/{}", id),
            Page::Categories => "/admin/categories".to_string(),
            Page::Rentals => "/admin/rentals".to_string(),
        }
    }

    /// Match a request path against the route table.
    ///
    /// Trailing slashes and empty segments are ignored. Unknown paths yield
    /// `None` and are left to the catch-all.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let page = match segments.as_slice() {
            [] => Page::Login,
            ["register"] => Page::Register,
            ["home"] => Page::MemberHome,
            ["books", id] => Page::BookDetail { id: id.to_string() },
            ["admin"] => Page::Dashboard,
            ["admin", "users"] => Page::Users,
            ["admin", "users", id] => Page::UserEdit { id: id.to_string() },
            ["admin", "books"] => Page::Books,
            ["admin", "books", "add"] => Page::BookCreate,
            ["admin", "books", id] => Page::BookEdit { id: id.to_string() },
            ["admin", "categories"] => Page::Categories,
            ["admin", "rentals"] => Page::Rentals,
            _ => return None,
        };
        Some(page)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
