use chrono::NaiveDate;
use thiserror::Error;

use crate::application::ErrorKind;
use crate::ports::StoreError;

/// 貸出エンジンのエラー
#[derive(Debug, Error)]
pub enum LendingError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// 有効な貸出が存在しない（二重返却、ID違い）
    #[error("Loan not found")]
    LoanNotFound,

    /// 書籍が既に貸出中（同時貸出の競合に負けた場合を含む）
    #[error("Book is already on loan")]
    BookOnLoan,

    /// 返却予定日が貸出日より前
    #[error("Due date {due_date} is before checkout date {checkout_date}")]
    InvalidLoanPeriod {
        checkout_date: NaiveDate,
        due_date: NaiveDate,
    },

    /// loanableフラグと貸出台帳の不整合を検出した
    #[error("Lending invariant violated: {0}")]
    InvariantViolation(String),

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] StoreError),
}

impl LendingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LendingError::BookNotFound | LendingError::LoanNotFound => ErrorKind::NotFound,
            LendingError::BookOnLoan => ErrorKind::Conflict,
            LendingError::InvalidLoanPeriod { .. } => ErrorKind::InvalidArgument,
            LendingError::InvariantViolation(_) | LendingError::StoreError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// 貸出エンジンのResult型
pub type Result<T> = std::result::Result<T, LendingError>;
