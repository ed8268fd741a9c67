//! Fetch, sort, paginate and refetch cycle shared by every admin table

use std::sync::Arc;

use async_trait::async_trait;

use super::sort::Comparator;
use super::state::ListState;
use crate::error::{AppError, AppResult};
use crate::session::{Session, SessionContext};

/// Remote collection a list page is fed from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListSource<T: Send + Sync + 'static>: Send + Sync {
    async fn fetch(&self, session: &Session) -> AppResult<Vec<T>>;
}

/// Identifies one issued load; only the newest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What happened to a completed load
#[derive(Debug)]
pub enum LoadOutcome {
    /// Records replaced
    Applied { count: usize },
    /// A newer load was issued after this one; its result was dropped
    Stale,
    /// Fetch failed; previous records are kept
    Failed(AppError),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}

/// Owns the records of one list page for as long as the page is shown.
///
/// Loads are tagged with an increasing generation. When two loads overlap
/// (mount and post-mutation refresh), the response of the older one is
/// ignored even if it arrives last.
pub struct ListPipeline<T: Send + Sync + 'static> {
    state: ListState<T>,
    source: Arc<dyn ListSource<T>>,
    session: SessionContext,
    issued: u64,
    settled: u64,
}

impl<T: Send + Sync + 'static> ListPipeline<T> {
    pub fn new(
        source: Arc<dyn ListSource<T>>,
        session: SessionContext,
        comparator: Comparator<T>,
        page_size: usize,
    ) -> Self {
        Self {
            state: ListState::new(comparator, page_size),
            source,
            session,
            issued: 0,
            settled: 0,
        }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListState<T> {
        &mut self.state
    }

    pub fn set_page(&mut self, n: usize) -> usize {
        self.state.set_page(n)
    }

    pub fn visible(&self) -> Vec<&T> {
        self.state.visible()
    }

    /// True while the newest issued load has not completed
    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    /// Register a new load; any earlier ticket becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket {
            generation: self.issued,
        }
    }

    /// Apply the result of the load identified by `ticket`
    pub fn complete_load(&mut self, ticket: LoadTicket, result: AppResult<Vec<T>>) -> LoadOutcome {
        if ticket.generation < self.issued {
            tracing::debug!(
                generation = ticket.generation,
                newest = self.issued,
                "Dropping stale list response"
            );
            return LoadOutcome::Stale;
        }
        self.settled = ticket.generation;

        match result {
            Ok(records) => {
                let count = records.len();
                self.state.replace_records(records);
                LoadOutcome::Applied { count }
            }
            Err(e) => {
                tracing::error!("Failed to load list: {}", e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fetch with the current session and replace the records wholesale
    pub async fn load(&mut self) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = match self.session.require_session() {
            Ok(session) => self.source.fetch(&session).await,
            Err(e) => Err(e),
        };
        self.complete_load(ticket, result)
    }
}

/// Something that re-reads its data after a successful mutation
#[async_trait]
pub trait Refresh: Send {
    async fn refresh(&mut self);
}

#[async_trait]
impl<T: Send + Sync + 'static> Refresh for ListPipeline<T> {
    async fn refresh(&mut self) {
        self.load().await;
    }
}

/// Refresh target for mutations made outside any list page
pub struct NoRefresh;

#[async_trait]
impl Refresh for NoRefresh {
    async fn refresh(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::sort::{by_key, SortOrder};
    use crate::session::MemorySessionStore;

    fn context(logged_in: bool) -> SessionContext {
        let store = if logged_in {
            MemorySessionStore::with_token("token")
        } else {
            MemorySessionStore::new()
        };
        SessionContext::new(Arc::new(store))
    }

    fn pipeline(source: MockListSource<u32>, logged_in: bool) -> ListPipeline<u32> {
        ListPipeline::new(
            Arc::new(source),
            context(logged_in),
            by_key(|v: &u32| *v, SortOrder::Ascending),
            10,
        )
    }

    #[tokio::test]
    async fn test_load_replaces_records() {
        let mut source = MockListSource::<u32>::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(vec![3, 1, 2]));

        let mut pipeline = pipeline(source, true);
        assert!(pipeline.load().await.is_applied());

        let visible: Vec<u32> = pipeline.visible().into_iter().copied().collect();
        assert_eq!(visible, vec![1, 2, 3]);
        assert!(!pipeline.is_loading());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_records() {
        let mut source = MockListSource::<u32>::new();
        let mut calls = 0;
        source.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(vec![1, 2])
            } else {
                Err(AppError::Internal("boom".to_string()))
            }
        });

        let mut pipeline = pipeline(source, true);
        pipeline.load().await;
        assert!(matches!(pipeline.load().await, LoadOutcome::Failed(_)));
        assert_eq!(pipeline.state().len(), 2);
    }

    #[tokio::test]
    async fn test_load_without_session_never_fetches() {
        let mut source = MockListSource::<u32>::new();
        source.expect_fetch().never();

        let mut pipeline = pipeline(source, false);
        match pipeline.load().await {
            LoadOutcome::Failed(e) => assert!(e.is_unauthorized()),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_load_gives_same_slice() {
        let mut source = MockListSource::<u32>::new();
        source
            .expect_fetch()
            .times(2)
            .returning(|_| Ok((0..23).rev().collect()));

        let mut pipeline = pipeline(source, true);
        pipeline.load().await;
        pipeline.set_page(2);
        let first: Vec<u32> = pipeline.visible().into_iter().copied().collect();
        pipeline.load().await;
        let second: Vec<u32> = pipeline.visible().into_iter().copied().collect();
        assert_eq!(first, second);
        assert_eq!(pipeline.state().page(), 2);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut pipeline = pipeline(MockListSource::<u32>::new(), true);

        let mount = pipeline.begin_load();
        let refresh = pipeline.begin_load();

        assert!(pipeline.complete_load(refresh, Ok(vec![1, 2, 3])).is_applied());
        // The mount response arrives after the refresh and must not win
        assert!(matches!(pipeline.complete_load(mount, Ok(vec![9])), LoadOutcome::Stale));
        assert_eq!(pipeline.state().len(), 3);
    }

    #[test]
    fn test_is_loading_tracks_newest_ticket() {
        let mut pipeline = pipeline(MockListSource::<u32>::new(), true);
        let first = pipeline.begin_load();
        let second = pipeline.begin_load();
        pipeline.complete_load(first, Ok(vec![]));
        assert!(pipeline.is_loading());
        pipeline.complete_load(second, Ok(vec![]));
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn test_delete_last_item_on_last_page_clamps_page() {
        let mut pipeline = pipeline(MockListSource::<u32>::new(), true);
        let ticket = pipeline.begin_load();
        pipeline.complete_load(ticket, Ok((0..21).collect()));
        assert_eq!(pipeline.set_page(3), 3);
        assert_eq!(pipeline.visible().len(), 1);

        // Refetch after the only record of page 3 was deleted
        let ticket = pipeline.begin_load();
        pipeline.complete_load(ticket, Ok((0..20).collect()));
        assert_eq!(pipeline.state().page(), 2);
        assert_eq!(pipeline.visible().len(), 10);
    }
}
