//! Patron Report Service - read-only status projection
//!
//! Aggregates a patron's loans, freshly computed fees and chronological
//! history. Calling this twice with unchanged store state yields identical
//! output.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{RecordStore, StoreError, valid_patron_id};
use crate::models::borrow_record::BorrowRecord;
use crate::services::late_fee::{self, LateFee};

/// One borrow record annotated with its current fee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanWithFee {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub current_fee: LateFee,
}

/// Status report for one patron.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatronReport {
    pub patron_id: String,
    /// Every record for the patron, each with a fee computed as of `today`.
    pub loans: Vec<LoanWithFee>,
    /// Sum of the per-loan fees.
    pub total_fees_owed: f64,
    pub outstanding_count: u64,
    /// Full history ordered by borrow date ascending.
    pub history: Vec<BorrowRecord>,
}

/// Build the status report for `patron_id` as of `today`.
///
/// An invalid patron id yields `Ok(None)`, a sentinel distinct from a valid
/// report with zero loans.
pub async fn patron_report(
    store: &dyn RecordStore,
    patron_id: &str,
    today: NaiveDate,
) -> Result<Option<PatronReport>, StoreError> {
    if !valid_patron_id(patron_id) {
        return Ok(None);
    }

    let records = store.patron_records(patron_id).await?;

    let mut loans = Vec::with_capacity(records.len());
    let mut total_fees_owed = 0.0;
    for record in records {
        let current_fee = late_fee::assess(record.due_date.date_naive(), today);
        total_fees_owed += current_fee.fee_amount;
        loans.push(LoanWithFee {
            record,
            current_fee,
        });
    }

    let outstanding_count = store.patron_outstanding_count(patron_id).await?;
    let history = store.patron_history(patron_id).await?;

    Ok(Some(PatronReport {
        patron_id: patron_id.to_string(),
        loans,
        total_fees_owed,
        outstanding_count,
        history,
    }))
}
