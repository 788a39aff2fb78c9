//! Late-fee calculation - pure policy over store state and a date
//!
//! The calculator never fails: preconditions that cannot produce a fee yield
//! a zero-fee result with a descriptive status instead of an error, so the
//! result is always safe to render. Fees are derived on demand and never
//! persisted, which keeps them consistent with the current date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{RecordStore, valid_patron_id};

/// Cap on the late fee for a single book.
pub const MAX_LATE_FEE: f64 = 15.0;
/// Daily rate for the first seven overdue days.
pub const FIRST_WEEK_DAILY_RATE: f64 = 0.5;
/// Daily rate from the eighth overdue day on.
pub const EXTENDED_DAILY_RATE: f64 = 1.0;

/// Descriptive classification attached to every fee result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    NotOverdue,
    Overdue,
    InvalidPatronId,
    InvalidBookId,
    BookNotFound,
    NoRecordsForPatron,
    NoRecordForBook,
    /// The record store could not be read; the fee degrades to zero.
    StoreUnavailable,
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FeeStatus::NotOverdue => "not overdue",
            FeeStatus::Overdue => "overdue",
            FeeStatus::InvalidPatronId => "invalid patron id",
            FeeStatus::InvalidBookId => "invalid book id",
            FeeStatus::BookNotFound => "book not found",
            FeeStatus::NoRecordsForPatron => "no records for this patron",
            FeeStatus::NoRecordForBook => "no record for this book",
            FeeStatus::StoreUnavailable => "record store unavailable",
        };
        write!(f, "{}", text)
    }
}

/// Fee breakdown for one (patron, book) pair. Transient, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateFee {
    pub fee_amount: f64,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl LateFee {
    fn zero(status: FeeStatus) -> Self {
        Self {
            fee_amount: 0.0,
            days_overdue: 0,
            status,
        }
    }
}

/// Tiered schedule: $0.50/day for the first 7 overdue days, $1.00/day
/// beyond, capped at [`MAX_LATE_FEE`].
pub fn fee_for_days_overdue(days_overdue: i64) -> f64 {
    if days_overdue <= 0 {
        return 0.0;
    }
    let fee = if days_overdue <= 7 {
        days_overdue as f64 * FIRST_WEEK_DAILY_RATE
    } else {
        7.0 * FIRST_WEEK_DAILY_RATE + (days_overdue - 7) as f64 * EXTENDED_DAILY_RATE
    };
    fee.min(MAX_LATE_FEE)
}

/// Assess a due date against today, date component only.
pub fn assess(due_date: NaiveDate, today: NaiveDate) -> LateFee {
    if due_date >= today {
        return LateFee::zero(FeeStatus::NotOverdue);
    }
    let days_overdue = (today - due_date).num_days();
    LateFee {
        fee_amount: fee_for_days_overdue(days_overdue),
        days_overdue,
        status: FeeStatus::Overdue,
    }
}

/// Calculate the late fee for one (patron, book) pair as of `today`.
///
/// The outstanding record for the pair wins when one exists; otherwise the
/// earliest historical record is assessed.
pub async fn calculate_late_fee(
    store: &dyn RecordStore,
    patron_id: &str,
    book_id: i32,
    today: NaiveDate,
) -> LateFee {
    if !valid_patron_id(patron_id) {
        return LateFee::zero(FeeStatus::InvalidPatronId);
    }

    if book_id < 1 {
        return LateFee::zero(FeeStatus::InvalidBookId);
    }

    let book = match store.get_book_by_id(book_id).await {
        Ok(book) => book,
        Err(e) => {
            tracing::warn!("Fee lookup failed reading book {}: {}", book_id, e.detail);
            return LateFee::zero(FeeStatus::StoreUnavailable);
        }
    };
    if book.is_none() {
        return LateFee::zero(FeeStatus::BookNotFound);
    }

    let records = match store.patron_records(patron_id).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Fee lookup failed reading records: {}", e.detail);
            return LateFee::zero(FeeStatus::StoreUnavailable);
        }
    };
    if records.is_empty() {
        return LateFee::zero(FeeStatus::NoRecordsForPatron);
    }

    let record = records
        .iter()
        .find(|r| r.book_id == book_id && r.is_outstanding())
        .or_else(|| records.iter().find(|r| r.book_id == book_id));

    match record {
        Some(record) => assess(record.due_date.date_naive(), today),
        None => LateFee::zero(FeeStatus::NoRecordForBook),
    }
}
