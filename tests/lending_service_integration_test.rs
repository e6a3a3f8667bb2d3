use futures::future::join_all;
use rusty_library_lending::adapters::memory::{FailPoint, InMemoryLibrary};
use rusty_library_lending::application::{
    ErrorKind, ServiceDependencies,
    lending::{LendingError, borrow_book, list_active_loans, return_book},
};
use rusty_library_lending::domain::commands::*;
use rusty_library_lending::domain::*;
use std::sync::Arc;

mod common;

use common::{borrow_cmd, date, load_book, seed_book, seed_user};

// ============================================================================
// ヘルパー
// ============================================================================

fn setup() -> (Arc<InMemoryLibrary>, ServiceDependencies) {
    let library = Arc::new(InMemoryLibrary::new());
    let deps = library.service_dependencies();
    (library, deps)
}

/// loanable = false ⇔ 台帳に貸出がちょうど1件
async fn assert_lending_invariant(deps: &ServiceDependencies, book_id: BookId) {
    let book = load_book(deps, book_id).await;
    let loan = deps.loan_ledger.get_by_book_id(book_id).await.unwrap();
    assert_eq!(
        !book.loanable,
        loan.is_some(),
        "loanable={} but ledger has {:?}",
        book.loanable,
        loan
    );
}

// ============================================================================
// 貸出
// ============================================================================

#[tokio::test]
async fn test_borrow_available_book() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let loan = borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();

    assert_eq!(loan.borrower_id, alice);
    assert_eq!(loan.book_id, book_id);
    assert_eq!(loan.checkout_date, date(2024, 6, 1));
    assert_eq!(loan.due_date, date(2024, 6, 15));

    let book = load_book(&deps, book_id).await;
    assert_eq!(book.state(), BookState::OnLoan);

    let stored = deps.loan_ledger.get_by_id(loan.loan_id).await.unwrap();
    assert_eq!(stored, Some(loan));
    assert_lending_invariant(&deps, book_id).await;
}

#[tokio::test]
async fn test_borrow_book_already_on_loan_is_conflict() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let bob = seed_user(&deps, "Bob").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let first = borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();
    let result = borrow_book(&deps, borrow_cmd(bob, book_id)).await;

    let err = result.unwrap_err();
    assert!(matches!(err, LendingError::BookOnLoan));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // 台帳は最初の貸出のまま
    let loan = deps.loan_ledger.get_by_book_id(book_id).await.unwrap();
    assert_eq!(loan.map(|l| l.loan_id), Some(first.loan_id));
    assert!(list_active_loans(&deps, bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_borrow_unknown_book_is_not_found() {
    let (_library, deps) = setup();
    let alice = seed_user(&deps, "Alice").await;

    let err = borrow_book(&deps, borrow_cmd(alice, BookId::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, LendingError::BookNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_borrow_with_due_date_before_checkout_writes_nothing() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let cmd = BorrowBook {
        borrower_id: alice,
        book_id,
        checkout_date: date(2024, 6, 15),
        due_date: date(2024, 6, 1),
    };
    let err = borrow_book(&deps, cmd).await.unwrap_err();

    assert!(matches!(err, LendingError::InvalidLoanPeriod { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(load_book(&deps, book_id).await.loanable);
    assert!(deps.loan_ledger.get_by_book_id(book_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_borrow_with_same_day_due_date_is_allowed() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let cmd = BorrowBook {
        borrower_id: alice,
        book_id,
        checkout_date: date(2024, 6, 1),
        due_date: date(2024, 6, 1),
    };

    assert!(borrow_book(&deps, cmd).await.is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_borrows_of_same_book_admit_exactly_one() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let mut borrowers = Vec::new();
    for i in 0..8 {
        borrowers.push(seed_user(&deps, &format!("Borrower{}", i)).await);
    }

    let handles = borrowers.iter().map(|borrower| {
        let deps = deps.clone();
        let cmd = borrow_cmd(*borrower, book_id);
        tokio::spawn(async move { borrow_book(&deps, cmd).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(LendingError::BookOnLoan)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(conflicts, borrowers.len() - 1);
    assert_lending_invariant(&deps, book_id).await;
}

// ============================================================================
// 返却
// ============================================================================

#[tokio::test]
async fn test_return_by_loan_id_makes_book_available_again() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let bob = seed_user(&deps, "Bob").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let loan = borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();

    return_book(
        &deps,
        ReturnBook {
            target: LoanLookup::ByLoanId(loan.loan_id),
        },
    )
    .await
    .unwrap();

    assert!(load_book(&deps, book_id).await.loanable);
    assert!(deps.loan_ledger.get_by_id(loan.loan_id).await.unwrap().is_none());
    assert_lending_invariant(&deps, book_id).await;

    // 返却後は別の利用者が借りられる
    assert!(borrow_book(&deps, borrow_cmd(bob, book_id)).await.is_ok());
}

#[tokio::test]
async fn test_return_by_book_id() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();

    return_book(
        &deps,
        ReturnBook {
            target: LoanLookup::ByBookId(book_id),
        },
    )
    .await
    .unwrap();

    assert!(load_book(&deps, book_id).await.loanable);
}

#[tokio::test]
async fn test_double_return_is_not_found_and_changes_nothing() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let loan = borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();
    let cmd = ReturnBook {
        target: LoanLookup::ByLoanId(loan.loan_id),
    };

    return_book(&deps, cmd.clone()).await.unwrap();
    let err = return_book(&deps, cmd).await.unwrap_err();

    assert!(matches!(err, LendingError::LoanNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(load_book(&deps, book_id).await.loanable);
}

#[tokio::test]
async fn test_return_of_book_that_is_not_on_loan_is_not_found() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let err = return_book(
        &deps,
        ReturnBook {
            target: LoanLookup::ByBookId(book_id),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, LendingError::LoanNotFound));
}

// ============================================================================
// 原子性（障害注入）
// ============================================================================

#[tokio::test]
async fn test_failure_after_loan_insert_rolls_back_borrow() {
    let (library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    library.fail_next_transaction_at(FailPoint::SetLoanable);
    let err = borrow_book(&deps, borrow_cmd(alice, book_id))
        .await
        .unwrap_err();

    assert!(matches!(err, LendingError::StoreError(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(load_book(&deps, book_id).await.loanable);
    assert!(deps.loan_ledger.get_by_book_id(book_id).await.unwrap().is_none());

    // 障害は1回だけ。再試行は成功する
    assert!(borrow_book(&deps, borrow_cmd(alice, book_id)).await.is_ok());
}

#[tokio::test]
async fn test_commit_failure_rolls_back_borrow() {
    let (library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    library.fail_next_transaction_at(FailPoint::Commit);
    assert!(borrow_book(&deps, borrow_cmd(alice, book_id)).await.is_err());

    assert_lending_invariant(&deps, book_id).await;
    assert!(load_book(&deps, book_id).await.loanable);
}

#[tokio::test]
async fn test_failure_during_return_keeps_loan() {
    let (library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let book_id = seed_book(&deps, owner, "Dune").await;

    let loan = borrow_book(&deps, borrow_cmd(alice, book_id)).await.unwrap();

    library.fail_next_transaction_at(FailPoint::SetLoanable);
    let err = return_book(
        &deps,
        ReturnBook {
            target: LoanLookup::ByLoanId(loan.loan_id),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(!load_book(&deps, book_id).await.loanable);
    assert!(deps.loan_ledger.get_by_id(loan.loan_id).await.unwrap().is_some());
}

// ============================================================================
// 貸出一覧
// ============================================================================

#[tokio::test]
async fn test_list_active_loans_joins_book_display_in_checkout_order() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let bob = seed_user(&deps, "Bob").await;
    let dune = seed_book(&deps, owner, "Dune").await;
    let emma = seed_book(&deps, owner, "Emma").await;
    let other = seed_book(&deps, owner, "Other").await;

    let mut later = borrow_cmd(alice, dune);
    later.checkout_date = date(2024, 6, 10);
    later.due_date = date(2024, 6, 20);
    borrow_book(&deps, later).await.unwrap();
    borrow_book(&deps, borrow_cmd(alice, emma)).await.unwrap();
    borrow_book(&deps, borrow_cmd(bob, other)).await.unwrap();

    let loans = list_active_loans(&deps, alice).await.unwrap();

    let titles: Vec<_> = loans.iter().map(|l| l.book.title.as_str()).collect();
    assert_eq!(titles, vec!["Emma", "Dune"]);
    assert!(loans.iter().all(|l| l.loan.borrower_id == alice));
}

#[tokio::test]
async fn test_sequence_of_borrows_and_returns_preserves_invariant() {
    let (_library, deps) = setup();
    let owner = seed_user(&deps, "Owner").await;
    let alice = seed_user(&deps, "Alice").await;
    let bob = seed_user(&deps, "Bob").await;
    let books = vec![
        seed_book(&deps, owner, "A").await,
        seed_book(&deps, owner, "B").await,
        seed_book(&deps, owner, "C").await,
    ];

    for (i, book_id) in books.iter().enumerate() {
        let borrower = if i % 2 == 0 { alice } else { bob };
        borrow_book(&deps, borrow_cmd(borrower, *book_id)).await.unwrap();
        let _ = borrow_book(&deps, borrow_cmd(alice, *book_id)).await;
    }
    return_book(
        &deps,
        ReturnBook {
            target: LoanLookup::ByBookId(books[1]),
        },
    )
    .await
    .unwrap();

    for book_id in &books {
        assert_lending_invariant(&deps, *book_id).await;
    }
    assert_eq!(list_active_loans(&deps, alice).await.unwrap().len(), 2);
    assert!(list_active_loans(&deps, bob).await.unwrap().is_empty());
}
