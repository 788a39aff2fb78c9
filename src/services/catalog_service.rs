//! Catalog Service - add-book validation and search
//!
//! Validation short-circuits on the first failing check and writes nothing
//! on failure; the store insert only happens once every rule has passed.

use crate::domain::{CatalogError, NewBook, RecordStore};
use crate::models::book::Book;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_AUTHOR_LEN: usize = 100;
pub const ISBN_LEN: usize = 13;

/// Add a new book to the catalog.
///
/// Title and author are stored trimmed. The ISBN must be exactly 13 digit
/// characters and globally unique.
pub async fn add_book(
    store: &dyn RecordStore,
    title: &str,
    author: &str,
    isbn: &str,
    total_copies: i32,
) -> Result<Book, CatalogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CatalogError::TitleTooLong);
    }

    let author = author.trim();
    if author.is_empty() {
        return Err(CatalogError::AuthorRequired);
    }
    if author.chars().count() > MAX_AUTHOR_LEN {
        return Err(CatalogError::AuthorTooLong);
    }

    // Digit-only, not just length 13
    if isbn.len() != ISBN_LEN || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return Err(CatalogError::InvalidIsbn);
    }

    if total_copies <= 0 {
        return Err(CatalogError::InvalidCopyCount);
    }

    if store.get_book_by_isbn(isbn).await?.is_some() {
        return Err(CatalogError::DuplicateIsbn);
    }

    let book = store
        .insert_book(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            total_copies,
            available_copies: total_copies,
        })
        .await?;

    tracing::info!("Added \"{}\" to the catalog (id {})", book.title, book.id);
    Ok(book)
}

/// Search the catalog by title, author or ISBN.
///
/// The search kind is matched case-insensitively; an unrecognized kind yields
/// an empty result. Title and author match by case-insensitive substring,
/// ISBN by exact equality. Store enumeration order is preserved.
pub async fn search_books(
    store: &dyn RecordStore,
    term: &str,
    kind: &str,
) -> Result<Vec<Book>, CatalogError> {
    let kind = kind.to_lowercase();
    if kind != "title" && kind != "author" && kind != "isbn" {
        return Ok(Vec::new());
    }

    let term_lower = term.to_lowercase();
    let books = store.get_all_books().await?;

    let matches = books
        .into_iter()
        .filter(|book| match kind.as_str() {
            "title" => book.title.to_lowercase().contains(&term_lower),
            "author" => book.author.to_lowercase().contains(&term_lower),
            _ => book.isbn == term,
        })
        .collect();

    Ok(matches)
}
