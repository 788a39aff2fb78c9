//! Application state containing the record store and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::RecordStore;
use crate::infrastructure::SeaOrmRecordStore;
use crate::services::circulation_service::BookLocks;

/// Application state shared across all callers of the service layer
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Record store (books and borrow records)
    pub store: Arc<dyn RecordStore>,
    /// Per-book locks serializing borrow/return
    pub locks: Arc<BookLocks>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        let store = Arc::new(SeaOrmRecordStore::new(db.clone()));

        Self {
            db,
            store,
            locks: Arc::new(BookLocks::new()),
        }
    }

    /// Get the raw database connection (for test fixtures and migrations)
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
