//! Domain error types
//!
//! Business-rule failures are ordinary values, one sum type per operation.
//! `Display` carries the human-readable message shown to patrons; callers
//! branch on the variant, never on the message text.

use std::fmt;

/// Failure inside the record store backend (a failed insert or update).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    /// The step that failed, e.g. "adding the book".
    pub step: String,
    pub detail: String,
}

impl StoreError {
    pub fn new(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Database error occurred while {}.", self.step)
    }
}

impl std::error::Error for StoreError {}

impl From<sea_orm::DbErr> for StoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        StoreError::new("accessing the record store", e.to_string())
    }
}

/// Failures of `add_book` / `search_books`.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    TitleRequired,
    TitleTooLong,
    AuthorRequired,
    AuthorTooLong,
    InvalidIsbn,
    InvalidCopyCount,
    DuplicateIsbn,
    Store(StoreError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::TitleRequired => write!(f, "Title is required."),
            CatalogError::TitleTooLong => write!(f, "Title must be less than 200 characters."),
            CatalogError::AuthorRequired => write!(f, "Author is required."),
            CatalogError::AuthorTooLong => write!(f, "Author must be less than 100 characters."),
            CatalogError::InvalidIsbn => write!(f, "ISBN must be exactly 13 digits."),
            CatalogError::InvalidCopyCount => {
                write!(f, "Total copies must be a positive integer.")
            }
            CatalogError::DuplicateIsbn => write!(f, "A book with this ISBN already exists."),
            CatalogError::Store(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::Store(e)
    }
}

/// Failures of `borrow_book`.
#[derive(Debug, Clone, PartialEq)]
pub enum BorrowError {
    InvalidPatronId,
    BookNotFound,
    NotAvailable,
    LimitReached,
    AlreadyBorrowed,
    Store(StoreError),
}

impl fmt::Display for BorrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BorrowError::InvalidPatronId => {
                write!(f, "Invalid patron ID. Must be exactly 6 digits.")
            }
            BorrowError::BookNotFound => write!(f, "Book not found."),
            BorrowError::NotAvailable => write!(f, "This book is currently not available."),
            BorrowError::LimitReached => {
                write!(f, "You have reached the maximum borrowing limit of 5 books.")
            }
            BorrowError::AlreadyBorrowed => {
                write!(f, "You can only borrow the same book once.")
            }
            BorrowError::Store(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for BorrowError {}

impl From<StoreError> for BorrowError {
    fn from(e: StoreError) -> Self {
        BorrowError::Store(e)
    }
}

/// Failures of `return_book`.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnError {
    InvalidPatronId,
    BookNotFound,
    /// No record at all for this (patron, book) pair.
    NotBorrowed,
    /// A record exists but it is no longer outstanding.
    AlreadyReturned,
    Store(StoreError),
}

impl fmt::Display for ReturnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnError::InvalidPatronId => {
                write!(f, "Invalid patron ID. Must be exactly 6 digits.")
            }
            ReturnError::BookNotFound => write!(f, "Book not found."),
            ReturnError::NotBorrowed => {
                write!(f, "This book is not borrowed by this patron.")
            }
            ReturnError::AlreadyReturned => {
                write!(f, "This book has already been returned.")
            }
            ReturnError::Store(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ReturnError {}

impl From<StoreError> for ReturnError {
    fn from(e: StoreError) -> Self {
        ReturnError::Store(e)
    }
}

/// Failures of `pay_late_fee`.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentError {
    InvalidPatronId,
    NoFeeDue,
    BookNotFound,
    /// The gateway answered and declined the charge.
    Declined(String),
    /// The gateway could not be reached, timed out or faulted.
    Gateway(String),
    Store(StoreError),
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentError::InvalidPatronId => {
                write!(f, "Invalid patron ID. Must be exactly 6 digits.")
            }
            PaymentError::NoFeeDue => write!(f, "No late fees to pay for this book."),
            PaymentError::BookNotFound => write!(f, "Book not found."),
            PaymentError::Declined(msg) => write!(f, "Payment failed: {}", msg),
            PaymentError::Gateway(msg) => write!(f, "Payment processing error: {}", msg),
            PaymentError::Store(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for PaymentError {}

impl From<StoreError> for PaymentError {
    fn from(e: StoreError) -> Self {
        PaymentError::Store(e)
    }
}

/// Failures of `refund_late_fee`.
#[derive(Debug, Clone, PartialEq)]
pub enum RefundError {
    InvalidTransactionId,
    NonPositiveAmount,
    ExceedsFeeCap,
    Declined(String),
    Gateway(String),
}

impl fmt::Display for RefundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefundError::InvalidTransactionId => write!(f, "Invalid transaction ID."),
            RefundError::NonPositiveAmount => {
                write!(f, "Refund amount must be greater than 0.")
            }
            RefundError::ExceedsFeeCap => {
                write!(f, "Refund amount exceeds maximum late fee.")
            }
            RefundError::Declined(msg) => write!(f, "Refund failed: {}", msg),
            RefundError::Gateway(msg) => write!(f, "Refund processing error: {}", msg),
        }
    }
}

impl std::error::Error for RefundError {}
