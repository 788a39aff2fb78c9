//! SeaORM implementation of RecordStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::{NewBook, RecordStore, StoreError};
use crate::models::book::{self, Book, Entity as BookEntity};
use crate::models::borrow_record::{self, BorrowRecord, Entity as RecordEntity};

/// SeaORM-based implementation of RecordStore
pub struct SeaOrmRecordStore {
    db: DatabaseConnection,
}

impl SeaOrmRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    async fn get_book_by_id(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let model = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Book::from))
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let model = BookEntity::find()
            .filter(book::Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?;
        Ok(model.map(Book::from))
    }

    async fn get_all_books(&self) -> Result<Vec<Book>, StoreError> {
        let models = BookEntity::find()
            .order_by_asc(book::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn insert_book(&self, new: NewBook) -> Result<Book, StoreError> {
        let now = Utc::now().to_rfc3339();

        let model = book::ActiveModel {
            title: Set(new.title),
            author: Set(new.author),
            isbn: Set(new.isbn),
            total_copies: Set(new.total_copies),
            available_copies: Set(new.available_copies),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::new("adding the book", e.to_string()))?;
        Ok(Book::from(saved))
    }

    async fn patron_outstanding_count(&self, patron_id: &str) -> Result<u64, StoreError> {
        let count = RecordEntity::find()
            .filter(borrow_record::Column::PatronId.eq(patron_id))
            .filter(borrow_record::Column::ReturnDate.is_null())
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn patron_records(&self, patron_id: &str) -> Result<Vec<BorrowRecord>, StoreError> {
        let models = RecordEntity::find()
            .filter(borrow_record::Column::PatronId.eq(patron_id))
            .order_by_asc(borrow_record::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(BorrowRecord::from).collect())
    }

    async fn find_outstanding(
        &self,
        patron_id: &str,
        book_id: i32,
    ) -> Result<Option<BorrowRecord>, StoreError> {
        let model = RecordEntity::find()
            .filter(borrow_record::Column::PatronId.eq(patron_id))
            .filter(borrow_record::Column::BookId.eq(book_id))
            .filter(borrow_record::Column::ReturnDate.is_null())
            .one(&self.db)
            .await?;
        Ok(model.map(BorrowRecord::from))
    }

    async fn create_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> Result<Option<BorrowRecord>, StoreError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::new("creating the borrow record", e.to_string()))?;

        // Conditional decrement: the loser of a borrow race matches zero rows
        // here instead of driving the count negative.
        let updated = BookEntity::update_many()
            .col_expr(
                book::Column::AvailableCopies,
                Expr::col(book::Column::AvailableCopies).sub(1),
            )
            .col_expr(
                book::Column::UpdatedAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(book::Column::Id.eq(book_id))
            .filter(book::Column::AvailableCopies.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| StoreError::new("updating book availability", e.to_string()))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| StoreError::new("updating book availability", e.to_string()))?;
            return Ok(None);
        }

        let record = borrow_record::ActiveModel {
            patron_id: Set(patron_id.to_string()),
            book_id: Set(book_id),
            borrow_date: Set(borrow_date),
            due_date: Set(due_date),
            return_date: Set(None),
            ..Default::default()
        };

        let saved = record
            .insert(&txn)
            .await
            .map_err(|e| StoreError::new("creating the borrow record", e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| StoreError::new("creating the borrow record", e.to_string()))?;

        Ok(Some(BorrowRecord::from(saved)))
    }

    async fn complete_return(
        &self,
        record_id: i32,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::new("recording the return", e.to_string()))?;

        // Only an outstanding record can be closed; a second return of the
        // same record matches zero rows.
        let closed = RecordEntity::update_many()
            .col_expr(borrow_record::Column::ReturnDate, Expr::value(return_date))
            .filter(borrow_record::Column::Id.eq(record_id))
            .filter(borrow_record::Column::ReturnDate.is_null())
            .exec(&txn)
            .await
            .map_err(|e| StoreError::new("recording the return", e.to_string()))?;

        if closed.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| StoreError::new("recording the return", e.to_string()))?;
            return Ok(false);
        }

        let updated = BookEntity::update_many()
            .col_expr(
                book::Column::AvailableCopies,
                Expr::col(book::Column::AvailableCopies).add(1),
            )
            .col_expr(
                book::Column::UpdatedAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(book::Column::Id.eq(book_id))
            .filter(
                Expr::col(book::Column::AvailableCopies)
                    .lt(Expr::col(book::Column::TotalCopies)),
            )
            .exec(&txn)
            .await
            .map_err(|e| StoreError::new("updating book availability", e.to_string()))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| StoreError::new("updating book availability", e.to_string()))?;
            return Ok(false);
        }

        txn.commit()
            .await
            .map_err(|e| StoreError::new("recording the return", e.to_string()))?;

        Ok(true)
    }

    async fn patron_history(&self, patron_id: &str) -> Result<Vec<BorrowRecord>, StoreError> {
        let models = RecordEntity::find()
            .filter(borrow_record::Column::PatronId.eq(patron_id))
            .order_by_asc(borrow_record::Column::BorrowDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(BorrowRecord::from).collect())
    }
}
