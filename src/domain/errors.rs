use chrono::NaiveDate;

/// 貸出期間のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanPeriodError {
    /// 返却予定日が貸出日より前
    DueBeforeCheckout {
        checkout_date: NaiveDate,
        due_date: NaiveDate,
    },
}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowBookError {
    /// 既に貸出中
    BookOnLoan,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnBookError {
    /// 貸出レコードが指す書籍と一致しない
    BookMismatch,
    /// 書籍が貸出中になっていない（不変条件の破れ）
    BookNotOnLoan,
}

/// 書籍情報のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyImageUrl,
    TooLong { field: &'static str, max: usize },
}
