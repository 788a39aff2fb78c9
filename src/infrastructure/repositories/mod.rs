//! Repository implementations using SeaORM

pub mod record_store;

pub use record_store::SeaOrmRecordStore;
