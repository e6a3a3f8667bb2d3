use crate::domain::{Book, BookId, Loan, LoanId, LoanLookup};
use async_trait::async_trait;

use super::errors::Result;

/// 貸出ストアポート
///
/// カタログストアと貸出台帳を1つの原子単位で更新するための入口。
/// 排他はストアのトランザクション分離に任せ、アプリケーション側で
/// ロックを持たない。
#[async_trait]
pub trait LendingStore: Send + Sync {
    /// トランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn LendingTransaction>>;
}

/// 貸出トランザクション
///
/// `commit`せずに破棄された場合（早期リターン、キャンセルされたFuture）は
/// すべての書き込みがロールバックされる。
#[async_trait]
pub trait LendingTransaction: Send {
    /// カタログ：書籍を行ロック付きで取得する
    ///
    /// 同じ書籍に対する他のトランザクションはコミットまで待たされる。
    async fn lock_book(&mut self, book_id: BookId) -> Result<Option<Book>>;

    /// カタログ：`loanable`を条件付きで更新する
    ///
    /// 現在値が`expected`の場合のみ`new_value`に更新し、更新したかどうかを返す。
    async fn set_loanable(&mut self, book_id: BookId, expected: bool, new_value: bool)
    -> Result<bool>;

    /// 台帳：貸出を作成する
    ///
    /// 同じ書籍の貸出が既にある場合は`StoreError::UniqueViolation`。
    async fn create_loan(&mut self, loan: &Loan) -> Result<()>;

    /// 台帳：貸出を行ロック付きで取得する
    async fn lock_loan(&mut self, lookup: LoanLookup) -> Result<Option<Loan>>;

    /// 台帳：貸出を削除し、削除したかどうかを返す
    async fn delete_loan(&mut self, loan_id: LoanId) -> Result<bool>;

    /// コミットする
    async fn commit(self: Box<Self>) -> Result<()>;
}
