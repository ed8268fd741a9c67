//! Generic list pipeline behind the users, books, categories and rentals tables

pub mod pipeline;
pub mod sort;
pub mod state;

pub use pipeline::{ListPipeline, ListSource, LoadOutcome, LoadTicket, NoRefresh, Refresh};
pub use sort::{by_key, Comparator, SortOrder};
pub use state::ListState;
