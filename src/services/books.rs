//! Book catalogue management

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Method,
};
use validator::Validate;

use crate::{
    api::ApiClient,
    error::AppResult,
    list::ListSource,
    models::book::{Book, BookForm},
    session::Session,
};

#[derive(Clone)]
pub struct BooksService {
    api: ApiClient,
}

impl BooksService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, session: &Session) -> AppResult<Vec<Book>> {
        self.api.get_data("books", session).await
    }

    pub async fn get(&self, session: &Session, id: &str) -> AppResult<Book> {
        self.api.get_data(&format!("books/{}", id), session).await
    }

    pub async fn create(&self, session: &Session, book: &BookForm) -> AppResult<String> {
        book.validate_for_create()?;
        let form = multipart_form(book).await?;
        self.api
            .mutate_multipart(Method::POST, "books/create", session, form)
            .await
    }

    pub async fn update(&self, session: &Session, id: &str, book: &BookForm) -> AppResult<String> {
        book.validate()?;
        let form = multipart_form(book).await?;
        self.api
            .mutate_multipart(Method::PUT, &format!("books/update/{}", id), session, form)
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> AppResult<String> {
        self.api
            .mutate_empty(Method::DELETE, &format!("books/delete/{}", id), session)
            .await
    }

    pub async fn restore(&self, session: &Session, id: &str) -> AppResult<String> {
        self.api
            .mutate_empty(Method::PUT, &format!("books/restore/{}", id), session)
            .await
    }
}

/// Build the multipart body; category ids are sent one `category_ids[]` part each
async fn multipart_form(book: &BookForm) -> AppResult<Form> {
    let mut form = Form::new()
        .text("code_book", book.code_book.clone())
        .text("title", book.title.clone())
        .text("author", book.author.clone())
        .text("stock", book.stock.to_string())
        .text("description", book.description.clone());

    for id in &book.category_ids {
        form = form.text("category_ids[]", id.clone());
    }

    if let Some(path) = &book.image {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        form = form.part("image", Part::bytes(bytes).file_name(file_name));
    }

    Ok(form)
}

#[async_trait]
impl ListSource<Book> for BooksService {
    async fn fetch(&self, session: &Session) -> AppResult<Vec<Book>> {
        self.list(session).await
    }
}
