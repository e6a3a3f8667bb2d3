use crate::application::ServiceDependencies;
use crate::domain::{self, commands::*, *};
use crate::ports::StoreError;

use super::errors::{LendingError, Result};

/// 書籍を借りる
///
/// ビジネスルール：
/// - 返却予定日が貸出日以降であること（書き込み前に検証）
/// - 書籍が存在すること
/// - 書籍が貸出可能（Available）であること
///
/// # 原子性
///
/// 貸出レコードの作成と`loanable`の更新は1つのトランザクションで行う。
/// 途中で失敗した場合、トランザクションはコミットされずに破棄され、
/// 両方の書き込みがロールバックされる。
///
/// # 同時実行
///
/// 書籍の行ロック、`loanable`の条件付き更新、台帳の`book_id`一意制約の
/// いずれかで後続の貸出は必ず`BookOnLoan`になる。二重貸出は起きない。
///
/// # 冪等性
///
/// この関数は冪等ではない。自動リトライもしない。
/// `BookOnLoan`の後に再送された場合は、その時点の状態を改めて読む。
#[tracing::instrument(
    skip(deps, cmd),
    fields(book_id = %cmd.book_id, borrower_id = %cmd.borrower_id)
)]
pub async fn borrow_book(deps: &ServiceDependencies, cmd: BorrowBook) -> Result<Loan> {
    // 1. 貸出期間の検証（トランザクション開始前）
    let period = LoanPeriod::new(cmd.checkout_date, cmd.due_date).map_err(|e| match e {
        LoanPeriodError::DueBeforeCheckout {
            checkout_date,
            due_date,
        } => LendingError::InvalidLoanPeriod {
            checkout_date,
            due_date,
        },
    })?;

    // 2. トランザクション開始
    let mut tx = deps
        .lending_store
        .begin()
        .await
        .map_err(LendingError::StoreError)?;

    // 3. 書籍を行ロック付きで取得
    let book = tx
        .lock_book(cmd.book_id)
        .await
        .map_err(LendingError::StoreError)?
        .ok_or(LendingError::BookNotFound)?;

    // 4. ドメイン層の純粋関数を呼び出し
    let loan = domain::loan::borrow_book(&book, cmd.borrower_id, period, chrono::Utc::now())
        .map_err(|e| match e {
            BorrowBookError::BookOnLoan => LendingError::BookOnLoan,
        })?;

    // 5. 台帳に貸出を作成
    tx.create_loan(&loan).await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => LendingError::BookOnLoan,
        other => LendingError::StoreError(other),
    })?;

    // 6. loanableを true -> false に倒す
    let flipped = tx
        .set_loanable(book.book_id, true, false)
        .await
        .map_err(LendingError::StoreError)?;

    if !flipped {
        return Err(LendingError::BookOnLoan);
    }

    // 7. コミット
    tx.commit().await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => LendingError::BookOnLoan,
        other => LendingError::StoreError(other),
    })?;

    tracing::info!(loan_id = %loan.loan_id, "Book borrowed");

    Ok(loan)
}

/// 書籍を返却する
///
/// 貸出IDでも書籍IDでも指定できる。
///
/// ビジネスルール：
/// - 有効な貸出が存在すること（二重返却は`LoanNotFound`）
/// - 書籍が貸出中であること
///
/// 貸出レコードの削除と`loanable`の更新は1つのトランザクションで行う。
/// 貸出レコードが既に無い場合は何も書き込まない。
#[tracing::instrument(skip(deps, cmd), fields(target = ?cmd.target))]
pub async fn return_book(deps: &ServiceDependencies, cmd: ReturnBook) -> Result<()> {
    // 1. トランザクション開始
    let mut tx = deps
        .lending_store
        .begin()
        .await
        .map_err(LendingError::StoreError)?;

    // 2. 貸出を行ロック付きで取得
    let loan = tx
        .lock_loan(cmd.target)
        .await
        .map_err(LendingError::StoreError)?
        .ok_or(LendingError::LoanNotFound)?;

    // 3. 書籍を行ロック付きで取得し、返却の前提条件を検証
    let book = tx
        .lock_book(loan.book_id)
        .await
        .map_err(LendingError::StoreError)?
        .ok_or_else(|| {
            LendingError::InvariantViolation(format!(
                "loan {} references missing book {}",
                loan.loan_id, loan.book_id
            ))
        })?;

    domain::loan::return_book(&loan, &book).map_err(|e| {
        LendingError::InvariantViolation(format!(
            "cannot return loan {} for book {}: {:?}",
            loan.loan_id, book.book_id, e
        ))
    })?;

    // 4. 台帳から貸出を削除
    let deleted = tx
        .delete_loan(loan.loan_id)
        .await
        .map_err(LendingError::StoreError)?;

    if !deleted {
        return Err(LendingError::LoanNotFound);
    }

    // 5. loanableを false -> true に戻す
    let flipped = tx
        .set_loanable(loan.book_id, false, true)
        .await
        .map_err(LendingError::StoreError)?;

    if !flipped {
        return Err(LendingError::InvariantViolation(format!(
            "book {} was not on loan while loan {} existed",
            loan.book_id, loan.loan_id
        )));
    }

    // 6. コミット
    tx.commit().await.map_err(LendingError::StoreError)?;

    tracing::info!(loan_id = %loan.loan_id, book_id = %loan.book_id, "Book returned");

    Ok(())
}

/// 利用者の有効な貸出を書籍の表示項目付きで取得する
///
/// 読み取りのみ。トランザクションは使わない。
#[tracing::instrument(skip(deps))]
pub async fn list_active_loans(
    deps: &ServiceDependencies,
    borrower_id: UserId,
) -> Result<Vec<ActiveLoan>> {
    deps.loan_ledger
        .list_by_borrower(borrower_id)
        .await
        .map_err(LendingError::StoreError)
}
