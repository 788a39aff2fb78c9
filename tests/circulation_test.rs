use chrono::{Duration, Utc};
use circulib::db;
use circulib::domain::{BorrowError, RecordStore, ReturnError};
use circulib::infrastructure::SeaOrmRecordStore;
use circulib::models::book::Book;
use circulib::services::catalog_service::add_book;
use circulib::services::circulation_service::{BookLocks, borrow_book, return_book};
use circulib::services::late_fee::FeeStatus;

async fn setup_store() -> SeaOrmRecordStore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    SeaOrmRecordStore::new(db)
}

async fn seed_book(store: &SeaOrmRecordStore, title: &str, isbn: &str, copies: i32) -> Book {
    add_book(store, title, "Test Author", isbn, copies)
        .await
        .expect("Failed to seed book")
}

async fn availability(store: &SeaOrmRecordStore, book_id: i32) -> i32 {
    store
        .get_book_by_id(book_id)
        .await
        .expect("lookup failed")
        .expect("book missing")
        .available_copies
}

#[tokio::test]
async fn borrow_and_return_round_trip() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "The Great Gatsby", "9780743273565", 3).await;

    let receipt = borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("borrow failed");

    let expected_due = (Utc::now() + Duration::days(14)).date_naive();
    assert_eq!(receipt.record.due_date.date_naive(), expected_due);
    assert!(receipt.record.is_outstanding());
    assert!(receipt.message().contains("The Great Gatsby"));
    assert_eq!(availability(&store, book.id).await, 2);

    let returned = return_book(&store, &locks, "111111", book.id)
        .await
        .expect("return failed");

    assert_eq!(returned.fee.fee_amount, 0.0);
    assert_eq!(returned.fee.days_overdue, 0);
    assert_eq!(returned.fee.status, FeeStatus::NotOverdue);
    assert!(returned.record.return_date.is_some());
    assert_eq!(availability(&store, book.id).await, 3);
}

#[tokio::test]
async fn borrow_rejects_malformed_patron_ids() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "1984", "9780451524935", 1).await;

    for bad in ["", "12345", "1234567", "12a456"] {
        let err = borrow_book(&store, &locks, bad, book.id)
            .await
            .expect_err("malformed patron id accepted");
        assert_eq!(err, BorrowError::InvalidPatronId);
    }
    assert_eq!(availability(&store, book.id).await, 1);
}

#[tokio::test]
async fn borrow_unknown_book_fails() {
    let store = setup_store().await;
    let locks = BookLocks::new();

    let err = borrow_book(&store, &locks, "111111", 42)
        .await
        .expect_err("missing book accepted");
    assert_eq!(err, BorrowError::BookNotFound);
}

#[tokio::test]
async fn borrow_fails_when_no_copy_is_available() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "1984", "9780451524935", 1).await;

    borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("first borrow failed");

    let err = borrow_book(&store, &locks, "222222", book.id)
        .await
        .expect_err("borrowed past availability");
    assert_eq!(err, BorrowError::NotAvailable);
    assert_eq!(availability(&store, book.id).await, 0);
}

#[tokio::test]
async fn fifth_loan_is_allowed_sixth_is_rejected() {
    let store = setup_store().await;
    let locks = BookLocks::new();

    let mut books = Vec::new();
    for i in 0..6 {
        let isbn = format!("978000000000{}", i);
        books.push(seed_book(&store, &format!("Book {}", i), &isbn, 1).await);
    }

    for book in books.iter().take(4) {
        borrow_book(&store, &locks, "333333", book.id)
            .await
            .expect("borrow under the limit failed");
    }

    // With 4 outstanding, a 5th is allowed
    borrow_book(&store, &locks, "333333", books[4].id)
        .await
        .expect("fifth borrow rejected");

    // With exactly 5 outstanding, the 6th attempt is rejected
    let err = borrow_book(&store, &locks, "333333", books[5].id)
        .await
        .expect_err("borrowed past the limit");
    assert_eq!(err, BorrowError::LimitReached);
    assert_eq!(availability(&store, books[5].id).await, 1);
}

#[tokio::test]
async fn second_outstanding_loan_of_same_book_is_rejected() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "Moby Dick", "9781503280786", 2).await;

    borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("first borrow failed");

    let err = borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect_err("duplicate outstanding loan accepted");
    assert_eq!(err, BorrowError::AlreadyBorrowed);
    assert_eq!(availability(&store, book.id).await, 1);
}

#[tokio::test]
async fn reborrow_after_return_is_allowed() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "Moby Dick", "9781503280786", 1).await;

    borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("borrow failed");
    return_book(&store, &locks, "111111", book.id)
        .await
        .expect("return failed");

    borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("re-borrow after return failed");
    assert_eq!(availability(&store, book.id).await, 0);
}

#[tokio::test]
async fn return_without_any_record_fails() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "1984", "9780451524935", 2).await;

    // Another patron holds a copy, availability is below capacity
    borrow_book(&store, &locks, "999999", book.id)
        .await
        .expect("borrow failed");

    let err = return_book(&store, &locks, "111111", book.id)
        .await
        .expect_err("return without record accepted");
    assert_eq!(err, ReturnError::NotBorrowed);
}

#[tokio::test]
async fn second_return_is_distinguished_from_never_borrowed() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "1984", "9780451524935", 2).await;

    // Keep the book below full availability so only the record state decides
    borrow_book(&store, &locks, "999999", book.id)
        .await
        .expect("borrow failed");

    borrow_book(&store, &locks, "111111", book.id)
        .await
        .expect("borrow failed");
    return_book(&store, &locks, "111111", book.id)
        .await
        .expect("return failed");

    let err = return_book(&store, &locks, "111111", book.id)
        .await
        .expect_err("second return accepted");
    assert_eq!(err, ReturnError::AlreadyReturned);
}

#[tokio::test]
async fn overdue_return_reports_the_fee() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "Pride and Prejudice", "9781503290563", 4).await;

    // Record due 10 days ago, inserted directly through the store
    let record = store
        .create_borrow(
            "555555",
            book.id,
            Utc::now() - Duration::days(24),
            Utc::now() - Duration::days(10),
        )
        .await
        .expect("create_borrow failed")
        .expect("no copy available");
    assert!(record.is_outstanding());
    assert_eq!(availability(&store, book.id).await, 3);

    let receipt = return_book(&store, &locks, "555555", book.id)
        .await
        .expect("return failed");

    assert_eq!(receipt.fee.days_overdue, 10);
    assert_eq!(receipt.fee.fee_amount, 6.5);
    assert_eq!(receipt.fee.status, FeeStatus::Overdue);
    assert!(receipt.message().contains("$6.50"));
    assert_eq!(availability(&store, book.id).await, 4);
}

#[tokio::test]
async fn availability_never_leaves_its_bounds() {
    let store = setup_store().await;
    let locks = BookLocks::new();
    let book = seed_book(&store, "1984", "9780451524935", 2).await;

    borrow_book(&store, &locks, "111111", book.id).await.expect("borrow failed");
    borrow_book(&store, &locks, "222222", book.id).await.expect("borrow failed");
    assert_eq!(availability(&store, book.id).await, 0);

    // Exhausted: further borrows change nothing
    let _ = borrow_book(&store, &locks, "333333", book.id).await;
    assert_eq!(availability(&store, book.id).await, 0);

    return_book(&store, &locks, "111111", book.id).await.expect("return failed");
    return_book(&store, &locks, "222222", book.id).await.expect("return failed");
    assert_eq!(availability(&store, book.id).await, 2);

    // Back at capacity: a stray return cannot push it over
    let err = return_book(&store, &locks, "111111", book.id)
        .await
        .expect_err("over-return accepted");
    assert_eq!(err, ReturnError::AlreadyReturned);
    assert_eq!(availability(&store, book.id).await, 2);
}

#[tokio::test]
async fn app_state_wires_store_and_locks_together() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let state = circulib::AppState::new(db);

    let book = add_book(state.store.as_ref(), "1984", "George Orwell", "9780451524935", 1)
        .await
        .expect("add_book failed");

    let receipt = borrow_book(state.store.as_ref(), &state.locks, "111111", book.id)
        .await
        .expect("borrow failed");
    assert!(receipt.record.is_outstanding());

    return_book(state.store.as_ref(), &state.locks, "111111", book.id)
        .await
        .expect("return failed");
}

#[tokio::test]
async fn concurrent_borrows_of_last_copy_produce_one_winner() {
    let store = std::sync::Arc::new(setup_store().await);
    let locks = std::sync::Arc::new(BookLocks::new());
    let book = seed_book(&store, "1984", "9780451524935", 1).await;

    let mut handles = Vec::new();
    for patron in ["111111", "222222", "333333", "444444"] {
        let store = store.clone();
        let locks = locks.clone();
        let book_id = book.id;
        handles.push(tokio::spawn(async move {
            borrow_book(store.as_ref(), &locks, patron, book_id).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.expect("task panicked").is_ok() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(availability(&store, book.id).await, 0);
}
