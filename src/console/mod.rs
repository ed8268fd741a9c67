//! Terminal front end.
//!
//! Every command opens the page it stands for through the route guard first,
//! then loads data or runs a confirmed mutation the way that page does.

pub mod prompt;
pub mod render;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use validator::Validate;

pub use prompt::{ConsoleNotifier, StdinConfirmer};

use crate::{
    error::{AppError, AppResult},
    list::{sort, Comparator, ListPipeline, ListSource, ListState, LoadOutcome, NoRefresh, Refresh},
    models::{Book, BookForm, CategoryForm, LoginRequest, RegisterUser, UpdateUser},
    mutation::{Entity, FailureKind, FlowOutcome, MutationFlow, MutationRequest, Notice, Notifier},
    routing::{GuardDecision, Page},
    session::Session,
    AppState,
};

/// Fields to change on a book; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub code_book: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub category_ids: Option<Vec<String>>,
    pub image: Option<PathBuf>,
}

impl BookChanges {
    pub fn apply(self, form: &mut BookForm) {
        if let Some(code_book) = self.code_book {
            form.code_book = code_book;
        }
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(author) = self.author {
            form.author = author;
        }
        if let Some(stock) = self.stock {
            form.stock = stock;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category_ids) = self.category_ids {
            form.category_ids = category_ids;
        }
        if self.image.is_some() {
            form.image = self.image;
        }
    }
}

pub struct Console {
    state: AppState,
    flow: MutationFlow,
    confirmer: StdinConfirmer,
    notifier: ConsoleNotifier,
}

impl Console {
    pub fn new(state: AppState, assume_yes: bool) -> Self {
        Self {
            state,
            flow: MutationFlow::new(),
            confirmer: StdinConfirmer::new(assume_yes),
            notifier: ConsoleNotifier,
        }
    }

    /// Route a path; `None` when the guard redirected elsewhere
    pub fn enter_path(&self, path: &str) -> Option<Page> {
        match self.state.guard.check(path) {
            GuardDecision::Render(page) => Some(page),
            GuardDecision::Redirect(to) => {
                println!("Redirected to {}", to);
                None
            }
        }
    }

    pub fn enter(&self, page: &Page) -> Option<Page> {
        self.enter_path(&page.path())
    }

    /// Print an error. A rejected token ends the session.
    pub fn report(&self, error: &AppError) {
        if error.is_unauthorized() {
            self.expire();
            return;
        }

        let fields = error.field_messages();
        if fields.is_empty() {
            eprintln!("Error: {}", error.server_message().map(str::to_string).unwrap_or_else(|| error.to_string()));
        } else {
            for (field, message) in fields {
                eprintln!("  {}: {}", field, message);
            }
        }
    }

    fn expire(&self) {
        if let Err(e) = self.state.session.invalidate() {
            tracing::warn!("Failed to clear session: {}", e);
        }
        eprintln!("Your session has expired. Please log in again.");
    }

    // Authentication pages

    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<()> {
        if self.enter(&Page::Login).is_none() {
            return Ok(());
        }

        let form = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let claim = self.state.services.auth.login(&form).await?;
        println!("Login success! Welcome, {}.", claim.email.as_deref().unwrap_or(claim.role.as_str()));
        self.open(claim.role.landing_path(), 1).await
    }

    pub async fn login_google(&mut self, credential: &str) -> AppResult<()> {
        if self.enter(&Page::Login).is_none() {
            return Ok(());
        }

        let claim = self.state.services.auth.login_with_google(credential).await?;
        println!("Login success! Welcome, {}.", claim.email.as_deref().unwrap_or(claim.role.as_str()));
        self.open(claim.role.landing_path(), 1).await
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> AppResult<()> {
        if self.enter(&Page::Register).is_none() {
            return Ok(());
        }

        let form = RegisterUser::new(name, email, password);
        let message = self.state.services.auth.register(&form).await?;
        if message.is_empty() {
            println!("Registration success! You can now log in.");
        } else {
            println!("{}", message);
        }
        Ok(())
    }

    pub fn logout(&self) -> AppResult<()> {
        self.state.services.auth.logout()?;
        println!("Logged out.");
        Ok(())
    }

    pub fn whoami(&self) {
        match self.state.session.identity() {
            Some(claim) => {
                println!("role:  {}", claim.role);
                if let Some(email) = &claim.email {
                    println!("email: {}", email);
                }
                if let Some(id) = &claim.id {
                    println!("id:    {}", id);
                }
            }
            None => println!("Not logged in."),
        }
    }

    // Page rendering

    /// Open any path the way the router would and render the resulting page
    pub async fn open(&mut self, path: &str, list_page: usize) -> AppResult<()> {
        let Some(page) = self.enter_path(path) else {
            return Ok(());
        };

        match page {
            Page::Login => println!("Log in with `library-client login <email> <password>`."),
            Page::Register => println!("Create an account with `library-client register <name> <email> <password>`."),
            Page::MemberHome => {
                let mut list = self.pipeline(self.state.services.books.clone(), sort::books_by_code());
                self.load(&mut list, list_page).await?;
                print!("{}", render::book_cards(list.state()));
            }
            Page::BookDetail { id } | Page::BookEdit { id } => {
                let session = self.state.session.require_session()?;
                let book = self.state.services.books.get(&session, &id).await?;
                print!("{}", render::book_detail(&book, &self.state.config.api.asset_url));
            }
            Page::Dashboard => {
                let session = self.state.session.require_session()?;
                let summary = self.state.services.stats.dashboard(&session).await;
                print!("{}", render::dashboard(&summary));
            }
            Page::Users => {
                let mut list = self.pipeline(self.state.services.users.clone(), sort::users_by_name());
                self.load(&mut list, list_page).await?;
                print!("{}", render::users_table(list.state()));
            }
            Page::UserEdit { id } => {
                let session = self.state.session.require_session()?;
                let user = self.state.services.users.get(&session, &id).await?;
                println!("{} <{}> {} {}", user.name, user.email, user.role, user.status_label());
            }
            Page::Books => {
                let mut list = self.pipeline(self.state.services.books.clone(), sort::books_by_code());
                self.load(&mut list, list_page).await?;
                print!("{}", render::books_table(list.state()));
            }
            Page::BookCreate => println!("Create a book with `library-client books create`."),
            Page::Categories => {
                let mut list = self.pipeline(self.state.services.categories.clone(), sort::categories_by_name());
                self.load(&mut list, list_page).await?;
                print!("{}", render::categories_table(list.state()));
            }
            Page::Rentals => {
                let mut list = self.pipeline(self.state.services.rentals.clone(), sort::rentals_by_date_desc());
                self.load(&mut list, list_page).await?;
                print!("{}", render::rentals_table(list.state()));
            }
        }
        Ok(())
    }

    fn pipeline<T, S>(&self, source: S, comparator: Comparator<T>) -> ListPipeline<T>
    where
        T: Send + Sync + 'static,
        S: ListSource<T> + 'static,
    {
        let source: Arc<dyn ListSource<T>> = Arc::new(source);
        ListPipeline::new(
            source,
            self.state.session.clone(),
            comparator,
            self.state.config.pagination.page_size,
        )
    }

    async fn load<T: Send + Sync + 'static>(&self, list: &mut ListPipeline<T>, page: usize) -> AppResult<()> {
        if let LoadOutcome::Failed(e) = list.load().await {
            return Err(e);
        }
        list.set_page(page);
        Ok(())
    }

    // Mutations

    async fn mutate<F, Fut, R>(&mut self, request: MutationRequest, commit: F, target: &mut R) -> FlowOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<String>>,
        R: Refresh + ?Sized,
    {
        let outcome = self
            .flow
            .run(request, &self.confirmer, &self.notifier, commit, target)
            .await;

        match &outcome {
            FlowOutcome::Rejected(rejection) => eprintln!("Rejected: {}", rejection),
            FlowOutcome::Cancelled => println!("Cancelled."),
            FlowOutcome::Failed { error, .. } if error.is_unauthorized() => self.expire(),
            _ => {}
        }
        outcome
    }

    /// Run a mutation from a list page, then show the refreshed page
    #[allow(clippy::too_many_arguments)]
    async fn mutate_from_list<T, S, F, Fut>(
        &mut self,
        page: Page,
        source: S,
        comparator: Comparator<T>,
        list_page: usize,
        request: MutationRequest,
        commit: F,
        render: fn(&ListState<T>) -> String,
    ) -> AppResult<()>
    where
        T: Send + Sync + 'static,
        S: ListSource<T> + 'static,
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = AppResult<String>>,
    {
        if self.enter(&page).is_none() {
            return Ok(());
        }
        let session = self.state.session.require_session()?;

        // A failed fetch only leaves the table empty; the action still goes through
        let mut list = self.pipeline(source, comparator);
        if list.load().await.is_applied() {
            list.set_page(list_page);
        }

        let outcome = self.mutate(request, move || commit(session), &mut list).await;
        if outcome.is_success() {
            print!("{}", render(list.state()));
        }
        Ok(())
    }

    pub async fn delete_user(&mut self, id: &str, list_page: usize) -> AppResult<()> {
        let users = self.state.services.users.clone();
        let id = id.to_string();
        let request = MutationRequest::delete(Entity::User, &id);
        self.mutate_from_list(
            Page::Users,
            users.clone(),
            sort::users_by_name(),
            list_page,
            request,
            move |session| async move { users.delete(&session, &id).await },
            render::users_table,
        )
        .await
    }

    pub async fn restore_user(&mut self, id: &str, list_page: usize) -> AppResult<()> {
        let users = self.state.services.users.clone();
        let id = id.to_string();
        let request = MutationRequest::restore(Entity::User, &id);
        self.mutate_from_list(
            Page::Users,
            users.clone(),
            sort::users_by_name(),
            list_page,
            request,
            move |session| async move { users.restore(&session, &id).await },
            render::users_table,
        )
        .await
    }

    pub async fn update_user(
        &mut self,
        id: &str,
        name: Option<&str>,
        email: Option<&str>,
        password: &str,
    ) -> AppResult<()> {
        if self.enter(&Page::UserEdit { id: id.to_string() }).is_none() {
            return Ok(());
        }
        let session = self.state.session.require_session()?;
        let users = self.state.services.users.clone();

        let user = users.get(&session, id).await?;
        let form = UpdateUser::from_user(
            &user,
            name.unwrap_or(&user.name),
            email.unwrap_or(&user.email),
            password,
        );
        form.validate()?;

        let id = id.to_string();
        let request = MutationRequest::update(Entity::User, &id);
        let outcome = self
            .mutate(
                request,
                move || async move { users.update(&session, &id, &form).await },
                &mut NoRefresh,
            )
            .await;

        if outcome.is_success() {
            self.open(&Page::Users.path(), 1).await?;
        }
        Ok(())
    }

    pub async fn create_book(&mut self, form: BookForm) -> AppResult<()> {
        if self.enter(&Page::BookCreate).is_none() {
            return Ok(());
        }
        let session = self.state.session.require_session()?;
        form.validate_for_create()?;

        let books = self.state.services.books.clone();
        let outcome = self
            .mutate(
                MutationRequest::create(Entity::Book),
                move || async move { books.create(&session, &form).await },
                &mut NoRefresh,
            )
            .await;

        if outcome.is_success() {
            self.open(&Page::Books.path(), 1).await?;
        }
        Ok(())
    }

    pub async fn update_book(&mut self, id: &str, changes: BookChanges) -> AppResult<()> {
        if self.enter(&Page::BookEdit { id: id.to_string() }).is_none() {
            return Ok(());
        }
        let session = self.state.session.require_session()?;
        let books = self.state.services.books.clone();

        let book = books.get(&session, id).await?;
        let mut form = BookForm::from_book(&book);
        changes.apply(&mut form);
        form.validate()?;

        let id = id.to_string();
        let request = MutationRequest::update(Entity::Book, &id);
        let outcome = self
            .mutate(
                request,
                move || async move { books.update(&session, &id, &form).await },
                &mut NoRefresh,
            )
            .await;

        if outcome.is_success() {
            self.open(&Page::Books.path(), 1).await?;
        }
        Ok(())
    }

    pub async fn delete_book(&mut self, id: &str, list_page: usize) -> AppResult<()> {
        let books = self.state.services.books.clone();
        let id = id.to_string();
        let request = MutationRequest::delete(Entity::Book, &id);
        self.mutate_from_list(
            Page::Books,
            books.clone(),
            sort::books_by_code(),
            list_page,
            request,
            move |session| async move { books.delete(&session, &id).await },
            render::books_table,
        )
        .await
    }

    pub async fn restore_book(&mut self, id: &str, list_page: usize) -> AppResult<()> {
        let books = self.state.services.books.clone();
        let id = id.to_string();
        let request = MutationRequest::restore(Entity::Book, &id);
        self.mutate_from_list(
            Page::Books,
            books.clone(),
            sort::books_by_code(),
            list_page,
            request,
            move |session| async move { books.restore(&session, &id).await },
            render::books_table,
        )
        .await
    }

    pub async fn create_category(&mut self, name: &str, list_page: usize) -> AppResult<()> {
        let form = CategoryForm { name: name.to_string() };
        form.validate()?;

        let categories = self.state.services.categories.clone();
        self.mutate_from_list(
            Page::Categories,
            categories.clone(),
            sort::categories_by_name(),
            list_page,
            MutationRequest::create(Entity::Category),
            move |session| async move { categories.create(&session, &form).await },
            render::categories_table,
        )
        .await
    }

    pub async fn update_category(&mut self, id: &str, name: &str, list_page: usize) -> AppResult<()> {
        let form = CategoryForm { name: name.to_string() };
        form.validate()?;

        let categories = self.state.services.categories.clone();
        let id = id.to_string();
        let request = MutationRequest::update(Entity::Category, &id);
        self.mutate_from_list(
            Page::Categories,
            categories.clone(),
            sort::categories_by_name(),
            list_page,
            request,
            move |session| async move { categories.update(&session, &id, &form).await },
            render::categories_table,
        )
        .await
    }

    pub async fn delete_category(&mut self, id: &str, list_page: usize) -> AppResult<()> {
        let categories = self.state.services.categories.clone();
        let id = id.to_string();
        let request = MutationRequest::delete(Entity::Category, &id);
        self.mutate_from_list(
            Page::Categories,
            categories.clone(),
            sort::categories_by_name(),
            list_page,
            request,
            move |session| async move { categories.delete(&session, &id).await },
            render::categories_table,
        )
        .await
    }

    /// Rent a book from its detail page
    pub async fn rent(&mut self, book_id: &str) -> AppResult<()> {
        let page = Page::BookDetail { id: book_id.to_string() };
        if self.enter(&page).is_none() {
            return Ok(());
        }
        let session = self.state.session.require_session()?;
        let book = self.state.services.books.get(&session, book_id).await?;

        let rentals = self.state.services.rentals.clone();
        let id = book.id.clone();
        self.rent_book(&book, move || async move { rentals.rent(&session, &id).await })
            .await;
        Ok(())
    }

    /// A book with no stock left cannot be rented; the request is never sent
    async fn rent_book<F, Fut>(&mut self, book: &Book, commit: F) -> Option<FlowOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<String>>,
    {
        if !book.is_available() {
            let text = FailureKind::OutOfStock.message(Entity::Book).unwrap_or_default();
            self.notifier.notify(&Notice::error(text));
            return None;
        }
        Some(self.mutate(MutationRequest::rent(&book.id), commit, &mut NoRefresh).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::pipeline::MockListSource;
    use crate::models::User;
    use crate::session::test_tokens::token_for_role;
    use crate::session::{MemorySessionStore, SessionStore};
    use crate::AppConfig;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn console(store: MemorySessionStore) -> Console {
        let store: Arc<dyn SessionStore> = Arc::new(store);
        let state = AppState::with_store(AppConfig::default(), store).unwrap();
        Console::new(state, true)
    }

    #[test]
    fn test_enter_redirects_without_session() {
        let console = console(MemorySessionStore::new());
        assert_eq!(console.enter(&Page::Users), None);
        assert_eq!(console.enter(&Page::Register), Some(Page::Register));
    }

    #[test]
    fn test_enter_respects_role() {
        let console = console(MemorySessionStore::with_token(&token_for_role("member")));
        assert_eq!(console.enter(&Page::MemberHome), Some(Page::MemberHome));
        assert_eq!(console.enter(&Page::Dashboard), None);
        assert_eq!(console.enter_path("/nowhere"), None);
    }

    #[tokio::test]
    async fn test_mutation_on_guarded_page_is_not_attempted() {
        // Logged out: the guard redirects before any request is built
        let mut console = console(MemorySessionStore::new());
        tokio_test::assert_ok!(console.delete_user("u1", 1).await);
        assert!(console.state.session.session().is_none());
    }

    #[tokio::test]
    async fn test_invalid_category_rejected_before_network() {
        let mut console = console(MemorySessionStore::with_token(&token_for_role("admin")));
        let err = tokio_test::assert_err!(console.create_category("", 1).await);
        assert_eq!(err.field_messages()[0].0, "name");
    }

    #[test]
    fn test_report_unauthorized_clears_session() {
        let console = console(MemorySessionStore::with_token(&token_for_role("admin")));
        console.report(&AppError::Authentication("jwt expired".to_string()));
        assert!(console.state.session.session().is_none());
    }

    #[test]
    fn test_book_changes_keep_unset_fields() {
        let mut form = BookForm {
            code_book: "BK-1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            stock: 3,
            description: "Spice".to_string(),
            category_ids: vec!["c1".to_string()],
            image: None,
        };
        BookChanges {
            stock: Some(0),
            title: Some("Dune Messiah".to_string()),
            ..BookChanges::default()
        }
        .apply(&mut form);

        assert_eq!(form.title, "Dune Messiah");
        assert_eq!(form.stock, 0);
        assert_eq!(form.code_book, "BK-1");
        assert_eq!(form.category_ids, vec!["c1".to_string()]);
    }

    #[tokio::test]
    async fn test_list_fetch_failure_does_not_block_delete() {
        let mut console = console(MemorySessionStore::with_token(&token_for_role("admin")));
        let mut source = MockListSource::<User>::new();
        source
            .expect_fetch()
            .returning(|_| Err(AppError::Internal("db down".to_string())));

        let committed = Arc::new(AtomicBool::new(false));
        let flag = committed.clone();
        let result = console
            .mutate_from_list(
                Page::Users,
                source,
                sort::users_by_name(),
                1,
                MutationRequest::delete(Entity::User, "u1"),
                move |_session| async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(String::new())
                },
                render::users_table,
            )
            .await;

        tokio_test::assert_ok!(result);
        assert!(committed.load(Ordering::SeqCst));
    }

    fn book(stock: i64) -> Book {
        Book {
            id: "b1".to_string(),
            code_book: "BK-1".to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            description: String::new(),
            image: None,
            stock,
            is_deleted: false,
            categories: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_out_of_stock_book_is_not_rented() {
        let mut console = console(MemorySessionStore::with_token(&token_for_role("member")));
        let committed = Arc::new(AtomicBool::new(false));
        let flag = committed.clone();

        let outcome = console
            .rent_book(&book(0), move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(String::new())
            })
            .await;

        assert!(outcome.is_none());
        assert!(!committed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_available_book_is_rented() {
        let mut console = console(MemorySessionStore::with_token(&token_for_role("member")));

        let outcome = console
            .rent_book(&book(2), || async { Ok("Rental success!".to_string()) })
            .await;

        assert!(outcome.is_some_and(|o| o.is_success()));
    }
}
