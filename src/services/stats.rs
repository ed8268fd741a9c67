//! Dashboard totals

use serde::Serialize;

use crate::{
    error::AppResult,
    services::{books::BooksService, rentals::RentalsService, users::UsersService},
    session::Session,
};

/// Totals shown on the admin dashboard. A count is `None` when its fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_users: Option<usize>,
    pub total_books: Option<usize>,
    pub total_rentals: Option<usize>,
}

impl DashboardSummary {
    fn from_results<U, B, R>(users: AppResult<Vec<U>>, books: AppResult<Vec<B>>, rentals: AppResult<Vec<R>>) -> Self {
        Self {
            total_users: count("users", users),
            total_books: count("books", books),
            total_rentals: count("rentals", rentals),
        }
    }
}

fn count<T>(what: &str, result: AppResult<Vec<T>>) -> Option<usize> {
    match result {
        Ok(records) => Some(records.len()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch {} for dashboard", what);
            None
        }
    }
}

#[derive(Clone)]
pub struct StatsService {
    users: UsersService,
    books: BooksService,
    rentals: RentalsService,
}

impl StatsService {
    pub fn new(users: UsersService, books: BooksService, rentals: RentalsService) -> Self {
        Self { users, books, rentals }
    }

    /// Fetch the three collections concurrently; one failure does not hide the other totals
    pub async fn dashboard(&self, session: &Session) -> DashboardSummary {
        let (users, books, rentals) = tokio::join!(
            self.users.list(session),
            self.books.list(session),
            self.rentals.list(session),
        );
        DashboardSummary::from_results(users, books, rentals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_partial_failure_keeps_other_totals() {
        let summary = DashboardSummary::from_results::<u8, u8, u8>(
            Ok(vec![1, 2, 3]),
            Err(AppError::Internal("boom".to_string())),
            Ok(vec![]),
        );
        assert_eq!(summary.total_users, Some(3));
        assert_eq!(summary.total_books, None);
        assert_eq!(summary.total_rentals, Some(0));
    }
}
