//! Circulation Service - borrow/return state transitions
//!
//! A (patron, book) pair moves Available -> Outstanding -> Returned; a new
//! outstanding record may be created for the pair once the previous one is
//! returned. Borrow and return for the same book are serialized through a
//! per-book lock, and the store's transactional writes back that up with
//! conditional updates, so the check-then-act window cannot corrupt
//! availability.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{BorrowError, RecordStore, ReturnError, valid_patron_id};
use crate::models::borrow_record::BorrowRecord;
use crate::services::late_fee::{self, LateFee};

/// Loan period granted on borrow.
pub const LOAN_PERIOD_DAYS: i64 = 14;
/// A patron may hold at most this many outstanding loans.
pub const MAX_OUTSTANDING_LOANS: u64 = 5;

/// Per-book mutexes serializing borrow/return operations.
pub struct BookLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl BookLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    fn for_book(&self, book_id: i32) -> Arc<Mutex<()>> {
        self.locks
            .entry(book_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for BookLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Confirmation of a successful borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowReceipt {
    pub record: BorrowRecord,
    pub book_title: String,
}

impl BorrowReceipt {
    pub fn message(&self) -> String {
        format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            self.book_title,
            self.record.due_date.format("%Y-%m-%d")
        )
    }
}

/// Confirmation of a successful return, with the fee assessed before the
/// record was closed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnReceipt {
    pub record: BorrowRecord,
    pub fee: LateFee,
}

impl ReturnReceipt {
    pub fn message(&self) -> String {
        format!(
            "Fee amount owed: ${:.2}\nDays overdue: {}\nStatus: {}",
            self.fee.fee_amount, self.fee.days_overdue, self.fee.status
        )
    }
}

/// Borrow a book for a patron.
///
/// Checked in order: patron id shape, book existence, availability, the
/// 5-loan limit, and the one-outstanding-loan-per-pair rule. On success the
/// record insert and the availability decrement commit as one store
/// transaction.
pub async fn borrow_book(
    store: &dyn RecordStore,
    locks: &BookLocks,
    patron_id: &str,
    book_id: i32,
) -> Result<BorrowReceipt, BorrowError> {
    if !valid_patron_id(patron_id) {
        return Err(BorrowError::InvalidPatronId);
    }

    let lock = locks.for_book(book_id);
    let _guard = lock.lock().await;

    let book = store
        .get_book_by_id(book_id)
        .await?
        .ok_or(BorrowError::BookNotFound)?;

    if book.available_copies <= 0 {
        return Err(BorrowError::NotAvailable);
    }

    let outstanding = store.patron_outstanding_count(patron_id).await?;
    if outstanding >= MAX_OUTSTANDING_LOANS {
        return Err(BorrowError::LimitReached);
    }

    if store.find_outstanding(patron_id, book_id).await?.is_some() {
        return Err(BorrowError::AlreadyBorrowed);
    }

    let borrow_date = Utc::now();
    let due_date = borrow_date + Duration::days(LOAN_PERIOD_DAYS);

    let record = store
        .create_borrow(patron_id, book_id, borrow_date, due_date)
        .await?
        // Lost the race against a writer outside this process
        .ok_or(BorrowError::NotAvailable)?;

    tracing::info!(
        "Patron {} borrowed book {} (due {})",
        patron_id,
        book_id,
        due_date.format("%Y-%m-%d")
    );

    Ok(BorrowReceipt {
        record,
        book_title: book.title,
    })
}

/// Return a borrowed book.
///
/// Only the outstanding record for the pair satisfies the match; a pair whose
/// records are all closed gets `AlreadyReturned`, a pair with no record at
/// all gets `NotBorrowed`. The late fee is assessed before any mutation so it
/// reflects the due date truthfully.
pub async fn return_book(
    store: &dyn RecordStore,
    locks: &BookLocks,
    patron_id: &str,
    book_id: i32,
) -> Result<ReturnReceipt, ReturnError> {
    if !valid_patron_id(patron_id) {
        return Err(ReturnError::InvalidPatronId);
    }

    let lock = locks.for_book(book_id);
    let _guard = lock.lock().await;

    store
        .get_book_by_id(book_id)
        .await?
        .ok_or(ReturnError::BookNotFound)?;

    let record = match store.find_outstanding(patron_id, book_id).await? {
        Some(record) => record,
        None => {
            let records = store.patron_records(patron_id).await?;
            if records.iter().any(|r| r.book_id == book_id) {
                return Err(ReturnError::AlreadyReturned);
            }
            return Err(ReturnError::NotBorrowed);
        }
    };

    let return_date: DateTime<Utc> = Utc::now();
    let fee = late_fee::assess(record.due_date.date_naive(), return_date.date_naive());

    let closed = store
        .complete_return(record.id, book_id, return_date)
        .await?;
    if !closed {
        // A writer outside this process closed the record first
        tracing::warn!(
            "Return of book {} for patron {} lost a race, record {} already closed",
            book_id,
            patron_id,
            record.id
        );
        return Err(ReturnError::AlreadyReturned);
    }

    tracing::info!(
        "Patron {} returned book {} ({} days overdue, ${:.2} owed)",
        patron_id,
        book_id,
        fee.days_overdue,
        fee.fee_amount
    );

    let record = BorrowRecord {
        return_date: Some(return_date),
        ..record
    };

    Ok(ReturnReceipt { record, fee })
}
