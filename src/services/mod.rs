//! Services Layer
//!
//! This module contains pure business logic without any transport layer.
//! Services take the record store (and, for payments, the gateway) as
//! explicit parameters, so every collaborator is injectable.

pub mod catalog_service;
pub mod circulation_service;
pub mod late_fee;
pub mod payment_service;
pub mod report_service;

// Re-export for convenience
pub use catalog_service::{add_book, search_books};
pub use circulation_service::{BookLocks, borrow_book, return_book};
pub use late_fee::{LateFee, calculate_late_fee};
pub use payment_service::{pay_late_fee, refund_late_fee};
pub use report_service::{PatronReport, patron_report};
