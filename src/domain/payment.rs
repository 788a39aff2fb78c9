//! Payment gateway contract
//!
//! The gateway itself is an external collaborator; only its contract lives
//! here. Implementations are injected into the payment workflow, which makes
//! them trivially replaceable by test doubles.

use async_trait::async_trait;
use std::fmt;

/// Transaction IDs handed out by the gateway carry this prefix.
pub const TXN_PREFIX: &str = "txn_";

/// Successful gateway response for a charge.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReceipt {
    /// Opaque transaction ID, prefixed with [`TXN_PREFIX`].
    pub transaction_id: String,
    pub message: String,
}

/// Failure reported by (or on the way to) the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The gateway processed the request and said no.
    Declined(String),
    /// Network fault, gateway crash, malformed response.
    Unavailable(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Declined(msg) => write!(f, "{}", msg),
            GatewayError::Unavailable(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// External payment processor contract.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` against the patron's account.
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: f64,
        description: &str,
    ) -> Result<GatewayReceipt, GatewayError>;

    /// Refund a previous charge. Returns the gateway's confirmation message.
    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: f64,
    ) -> Result<String, GatewayError>;
}
