//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM).
//! Only trait definitions, error types and small value types.

pub mod errors;
pub mod patron;
pub mod payment;
pub mod store;

pub use errors::{BorrowError, CatalogError, PaymentError, RefundError, ReturnError, StoreError};
pub use patron::valid_patron_id;
pub use payment::{GatewayError, GatewayReceipt, PaymentGateway, TXN_PREFIX};
pub use store::{NewBook, RecordStore};
