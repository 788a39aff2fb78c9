pub mod book;
pub mod borrow_record;

pub use book::Book;
pub use borrow_record::BorrowRecord;
