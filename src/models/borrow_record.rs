use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "borrow_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub patron_id: String,
    pub book_id: i32,
    pub borrow_date: DateTimeUtc,
    pub due_date: DateTimeUtc,
    // None while the loan is outstanding
    pub return_date: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for service results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: i32,
    pub patron_id: String,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    /// An outstanding loan has no return date recorded yet.
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }
}

impl From<Model> for BorrowRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            patron_id: model.patron_id,
            book_id: model.book_id,
            borrow_date: model.borrow_date,
            due_date: model.due_date,
            return_date: model.return_date,
        }
    }
}
