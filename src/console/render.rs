//! Plain-text rendering of pages

use std::fmt::Write;

use crate::{
    list::ListState,
    models::{Book, Category, Rental, User},
    services::stats::DashboardSummary,
};

/// Lay out rows under headers, padding each column to its widest cell
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| format!("{:<width$}", cells.get(i).map(String::as_str).unwrap_or(""), width = *w))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// `Page 2 of 3  [< prev] [next >]`, with unavailable directions omitted
pub fn pagination_footer<T>(state: &ListState<T>) -> String {
    let mut footer = format!("Page {} of {}", state.page(), state.total_pages());
    if state.has_prev() {
        footer.push_str("  [< prev]");
    }
    if state.has_next() {
        footer.push_str("  [next >]");
    }
    footer
}

/// Render the visible page of a list with row numbers and the pagination footer
fn numbered<T>(state: &ListState<T>, headers: &[&str], cells: impl Fn(&T) -> Vec<String>) -> String {
    if state.is_empty() {
        return format!("No records found.\n{}\n", pagination_footer(state));
    }
    let rows: Vec<Vec<String>> = state
        .visible()
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let mut row = vec![state.row_number(i).to_string()];
            row.extend(cells(record));
            row
        })
        .collect();
    format!("{}{}\n", table(headers, &rows), pagination_footer(state))
}

pub fn users_table(state: &ListState<User>) -> String {
    numbered(state, &["No", "Id", "Name", "Email", "Role", "Status"], |u| {
        vec![
            u.id.clone(),
            u.name.clone(),
            u.email.clone(),
            u.role.to_string(),
            u.status_label().to_string(),
        ]
    })
}

pub fn books_table(state: &ListState<Book>) -> String {
    numbered(state, &["No", "Id", "Code", "Title", "Author", "Stock", "Categories", "Status"], |b| {
        vec![
            b.id.clone(),
            b.code_book.clone(),
            b.title.clone(),
            b.author.clone(),
            b.stock.to_string(),
            category_names(&b.categories),
            b.status_label().to_string(),
        ]
    })
}

pub fn categories_table(state: &ListState<Category>) -> String {
    numbered(state, &["No", "Id", "Name"], |c| vec![c.id.clone(), c.name.clone()])
}

pub fn rentals_table(state: &ListState<Rental>) -> String {
    numbered(
        state,
        &["No", "Borrower", "Email", "Books", "Rented", "Due", "Returned", "Status"],
        |r| {
            vec![
                r.borrower_name().to_string(),
                r.borrower_email().to_string(),
                r.books.iter().map(|b| b.title.as_str()).collect::<Vec<_>>().join(", "),
                r.rental_date.format("%Y-%m-%d").to_string(),
                r.due_date.format("%Y-%m-%d").to_string(),
                r.return_label(),
                r.status.clone(),
            ]
        },
    )
}

/// Member home: one card per book
pub fn book_cards(state: &ListState<Book>) -> String {
    let mut out = String::new();
    for (i, book) in state.visible().into_iter().enumerate() {
        let _ = writeln!(out, "{}. {} by {} [{}]", state.row_number(i), book.title, book.author, book.availability_label());
        let _ = writeln!(out, "   {}", book.description_preview());
        let _ = writeln!(out, "   id: {}", book.id);
    }
    if state.is_empty() {
        out.push_str("No books available.\n");
    }
    let _ = writeln!(out, "{}", pagination_footer(state));
    out
}

pub fn book_detail(book: &Book, asset_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", book.title, book.code_book);
    let _ = writeln!(out, "Author:     {}", book.author);
    let _ = writeln!(out, "Categories: {}", category_names(&book.categories));
    let _ = writeln!(out, "Stock:      {} ({})", book.stock, book.availability_label());
    if let Some(url) = book.image_url(asset_url) {
        let _ = writeln!(out, "Cover:      {}", url);
    }
    let _ = writeln!(out, "\n{}", book.description);
    out
}

pub fn dashboard(summary: &DashboardSummary) -> String {
    let count = |n: Option<usize>| n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
    format!(
        "Dashboard\n  Total Users    {}\n  Total Books    {}\n  Total Rentals  {}\n",
        count(summary.total_users),
        count(summary.total_books),
        count(summary.total_rentals),
    )
}

fn category_names(categories: &[Category]) -> String {
    categories.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
}
