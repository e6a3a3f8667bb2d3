use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Book, BookDisplay, BookId, BorrowBookError, LoanId, LoanPeriod, ReturnBookError, UserId,
};

/// 貸出 - 現在有効な貸出レコード
///
/// 返却時に削除される。履歴は残さない。
/// 不変条件：1冊の書籍に対して有効な貸出は高々1件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub borrower_id: UserId,
    pub book_id: BookId,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// 利用者の貸出一覧の1行（貸出 + 書籍の表示項目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLoan {
    pub loan: Loan,
    pub book: BookDisplay,
}

/// 貸出の参照方法
///
/// 返却は貸出IDでも書籍IDでも指定できる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanLookup {
    ByLoanId(LoanId),
    ByBookId(BookId),
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出可能（Available）な書籍のみ貸し出せる
/// - 貸出期間は`LoanPeriod`で検証済み
///
/// 副作用なし。新しいLoanを返す。書籍の`loanable`の更新は呼び出し側の
/// トランザクションで行う。
pub fn borrow_book(
    book: &Book,
    borrower_id: UserId,
    period: LoanPeriod,
    now: DateTime<Utc>,
) -> Result<Loan, BorrowBookError> {
    if !book.loanable {
        return Err(BorrowBookError::BookOnLoan);
    }

    Ok(Loan {
        loan_id: LoanId::new(),
        borrower_id,
        book_id: book.book_id,
        checkout_date: period.checkout_date(),
        due_date: period.due_date(),
        created_at: now,
    })
}

/// 純粋関数：返却の前提条件を検証する
///
/// ビジネスルール：
/// - 貸出レコードが指す書籍であること
/// - 書籍が貸出中（OnLoan）であること
pub fn return_book(loan: &Loan, book: &Book) -> Result<(), ReturnBookError> {
    if loan.book_id != book.book_id {
        return Err(ReturnBookError::BookMismatch);
    }
    if book.loanable {
        return Err(ReturnBookError::BookNotOnLoan);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{BookDetails, new_book};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn available_book() -> Book {
        let details = BookDetails::new("The Rust Programming Language", "rust.png").unwrap();
        new_book(UserId::new(), details, Utc::now())
    }

    #[test]
    fn test_borrow_book_creates_loan_for_available_book() {
        let book = available_book();
        let borrower_id = UserId::new();
        let period = LoanPeriod::new(date("2024-01-01"), date("2024-01-15")).unwrap();

        let loan = borrow_book(&book, borrower_id, period, Utc::now()).unwrap();

        assert_eq!(loan.book_id, book.book_id);
        assert_eq!(loan.borrower_id, borrower_id);
        assert_eq!(loan.checkout_date, date("2024-01-01"));
        assert_eq!(loan.due_date, date("2024-01-15"));
    }

    #[test]
    fn test_borrow_book_fails_when_on_loan() {
        let mut book = available_book();
        book.loanable = false;
        let period = LoanPeriod::new(date("2024-01-01"), date("2024-01-15")).unwrap();

        let result = borrow_book(&book, UserId::new(), period, Utc::now());
        assert_eq!(result.unwrap_err(), BorrowBookError::BookOnLoan);
    }

    #[test]
    fn test_return_book_requires_on_loan_state() {
        let book = available_book();
        let period = LoanPeriod::new(date("2024-01-01"), date("2024-01-15")).unwrap();
        let loan = borrow_book(&book, UserId::new(), period, Utc::now()).unwrap();

        // 貸出エンジンがフラグを倒す前の状態
        assert_eq!(
            return_book(&loan, &book).unwrap_err(),
            ReturnBookError::BookNotOnLoan
        );

        let on_loan = Book {
            loanable: false,
            ..book
        };
        assert!(return_book(&loan, &on_loan).is_ok());
    }

    #[test]
    fn test_return_book_rejects_other_book() {
        let book = available_book();
        let period = LoanPeriod::new(date("2024-01-01"), date("2024-01-15")).unwrap();
        let loan = borrow_book(&book, UserId::new(), period, Utc::now()).unwrap();

        let mut other = available_book();
        other.loanable = false;

        assert_eq!(
            return_book(&loan, &other).unwrap_err(),
            ReturnBookError::BookMismatch
        );
    }
}
