use crate::domain::{ActiveLoan, BookId, Loan, LoanId, UserId};
use async_trait::async_trait;

use super::errors::Result;

/// 貸出台帳ポート（読み取り側）
///
/// 書き込み（作成・削除）はカタログの更新と同じ原子単位で行う必要があるため
/// `LendingTransaction`に置いている。
#[async_trait]
pub trait LoanLedger: Send + Sync {
    /// IDで有効な貸出を取得する
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 書籍IDで有効な貸出を取得する
    ///
    /// book_idには一意インデックスがあり、結果は高々1件。
    async fn get_by_book_id(&self, book_id: BookId) -> Result<Option<Loan>>;

    /// 利用者の有効な貸出を書籍の表示項目と結合して取得する
    ///
    /// 貸出日の昇順。
    async fn list_by_borrower(&self, borrower_id: UserId) -> Result<Vec<ActiveLoan>>;
}
