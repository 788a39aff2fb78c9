//! Record store trait definition
//!
//! The narrow contract over persisted books and borrow records. The SeaORM
//! implementation lives in the infrastructure layer; services only ever see
//! this trait, so the store is the single source of truth and tests can
//! substitute their own backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::StoreError;
use crate::models::book::Book;
use crate::models::borrow_record::BorrowRecord;

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Narrow access contract over `books` and `borrow_records`.
///
/// The two lifecycle writes (`create_borrow`, `complete_return`) are
/// transactional at this boundary: the availability adjustment and the record
/// write commit together or not at all, and the adjustment is a conditional
/// update so a racing writer loses cleanly instead of driving
/// `available_copies` out of its `0..=total_copies` range.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_book_by_id(&self, id: i32) -> Result<Option<Book>, StoreError>;

    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// All books in natural enumeration order.
    async fn get_all_books(&self) -> Result<Vec<Book>, StoreError>;

    async fn insert_book(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Count of records with no return date yet.
    async fn patron_outstanding_count(&self, patron_id: &str) -> Result<u64, StoreError>;

    /// Every record for the patron, outstanding and historical.
    async fn patron_records(&self, patron_id: &str) -> Result<Vec<BorrowRecord>, StoreError>;

    /// The single outstanding record for this (patron, book) pair, if any.
    async fn find_outstanding(
        &self,
        patron_id: &str,
        book_id: i32,
    ) -> Result<Option<BorrowRecord>, StoreError>;

    /// Insert a borrow record and decrement availability in one transaction.
    ///
    /// Returns `None` when the availability guard fails (no copy left), in
    /// which case nothing is written.
    async fn create_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Result<Option<BorrowRecord>, StoreError>;

    /// Set the record's return date and increment availability in one
    /// transaction.
    ///
    /// Returns `false` when either guard fails (record already returned, or
    /// availability already at capacity); nothing is written in that case.
    async fn complete_return(
        &self,
        record_id: i32,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Full borrowing history for the patron, ordered by borrow date
    /// ascending.
    async fn patron_history(&self, patron_id: &str) -> Result<Vec<BorrowRecord>, StoreError>;
}
