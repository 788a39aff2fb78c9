//! Payment Service - late-fee payment and refund over an injected gateway
//!
//! Thin orchestration: the fee comes from the calculator, the money moves
//! through the [`PaymentGateway`] contract. Gateway faults and timeouts are
//! converted to failed results at this boundary and never propagate.

use chrono::Utc;
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::{
    GatewayError, PaymentError, PaymentGateway, RecordStore, RefundError, TXN_PREFIX,
    valid_patron_id,
};
use crate::services::late_fee::{self, MAX_LATE_FEE};

/// Confirmation of a successful fee payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: f64,
    pub gateway_message: String,
}

impl PaymentReceipt {
    pub fn message(&self) -> String {
        format!("Payment successful! {}", self.gateway_message)
    }
}

/// Charge the patron's outstanding late fee for one book.
pub async fn pay_late_fee(
    store: &dyn RecordStore,
    gateway: &dyn PaymentGateway,
    gateway_timeout: Duration,
    patron_id: &str,
    book_id: i32,
) -> Result<PaymentReceipt, PaymentError> {
    if !valid_patron_id(patron_id) {
        return Err(PaymentError::InvalidPatronId);
    }

    let fee = late_fee::calculate_late_fee(store, patron_id, book_id, Utc::now().date_naive()).await;
    if fee.fee_amount <= 0.0 {
        return Err(PaymentError::NoFeeDue);
    }

    let book = store
        .get_book_by_id(book_id)
        .await?
        .ok_or(PaymentError::BookNotFound)?;

    let description = format!("Late fees for '{}'", book.title);

    let outcome = timeout(
        gateway_timeout,
        gateway.process_payment(patron_id, fee.fee_amount, &description),
    )
    .await;

    match outcome {
        Err(_) => Err(PaymentError::Gateway("payment gateway timed out".into())),
        Ok(Err(GatewayError::Declined(msg))) => Err(PaymentError::Declined(msg)),
        Ok(Err(GatewayError::Unavailable(msg))) => Err(PaymentError::Gateway(msg)),
        Ok(Ok(receipt)) => {
            tracing::info!(
                "Charged ${:.2} to patron {} for book {} ({})",
                fee.fee_amount,
                patron_id,
                book_id,
                receipt.transaction_id
            );
            Ok(PaymentReceipt {
                transaction_id: receipt.transaction_id,
                amount: fee.fee_amount,
                gateway_message: receipt.message,
            })
        }
    }
}

/// Refund a previous late-fee charge.
///
/// The transaction id must carry the gateway's `txn_` prefix and the amount
/// must fall in `(0, 15.00]`, the per-book fee cap.
pub async fn refund_late_fee(
    gateway: &dyn PaymentGateway,
    gateway_timeout: Duration,
    transaction_id: &str,
    amount: f64,
) -> Result<String, RefundError> {
    if !transaction_id.starts_with(TXN_PREFIX) {
        return Err(RefundError::InvalidTransactionId);
    }

    if amount <= 0.0 {
        return Err(RefundError::NonPositiveAmount);
    }

    if amount > MAX_LATE_FEE {
        return Err(RefundError::ExceedsFeeCap);
    }

    let outcome = timeout(
        gateway_timeout,
        gateway.refund_payment(transaction_id, amount),
    )
    .await;

    match outcome {
        Err(_) => Err(RefundError::Gateway("payment gateway timed out".into())),
        Ok(Err(GatewayError::Declined(msg))) => Err(RefundError::Declined(msg)),
        Ok(Err(GatewayError::Unavailable(msg))) => Err(RefundError::Gateway(msg)),
        Ok(Ok(message)) => {
            tracing::info!("Refunded ${:.2} on {}", amount, transaction_id);
            Ok(message)
        }
    }
}
