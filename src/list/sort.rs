//! Comparators used to order fetched records

use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{Book, Category, Rental, User};

/// Shared record comparator
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Compare records by an extracted key.
///
/// Ties keep their fetch order because the list sorts stably.
pub fn by_key<T, K, F>(key: F, order: SortOrder) -> Comparator<T>
where
    T: 'static,
    K: Ord + 'static,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    Arc::new(move |a: &T, b: &T| order.apply(key(a).cmp(&key(b))))
}

/// Users by name, case-sensitive lexical order
pub fn users_by_name() -> Comparator<User> {
    Arc::new(|a: &User, b: &User| a.name.cmp(&b.name))
}

/// Books by catalogue code, case-sensitive lexical order
pub fn books_by_code() -> Comparator<Book> {
    Arc::new(|a: &Book, b: &Book| a.code_book.cmp(&b.code_book))
}

pub fn categories_by_name() -> Comparator<Category> {
    Arc::new(|a: &Category, b: &Category| a.name.cmp(&b.name))
}

/// Rentals most recent first
pub fn rentals_by_date_desc() -> Comparator<Rental> {
    by_key(|r: &Rental| r.rental_date, SortOrder::Descending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_key_descending() {
        let cmp = by_key(|n: &i32| *n, SortOrder::Descending);
        let mut values = vec![1, 3, 2];
        values.sort_by(|a, b| cmp(a, b));
        assert_eq!(values, vec![3, 2, 1]);
    }

    #[test]
    fn test_case_sensitive_names() {
        let user = |name: &str| User {
            id: name.to_string(),
            name: name.to_string(),
            email: String::new(),
            role: crate::models::Role::Member,
            is_deleted: false,
        };
        let cmp = users_by_name();
        // Uppercase sorts before lowercase in byte order
        assert_eq!(cmp(&user("Zed"), &user("adam")), Ordering::Less);
    }
}
