use crate::domain::{Book, BookDetails, BookId, CatalogEntry, Page, PageRequest, UserId};
use async_trait::async_trait;

use super::errors::Result;

/// 削除の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteBookOutcome {
    Deleted,
    NotFound,
    /// 貸出中のため削除しなかった
    OnLoan,
}

/// カタログストアポート
///
/// 書籍レコードと`loanable`フラグの永続化を抽象化する。
/// `loanable`の条件付き更新は貸出トランザクション側
/// （`LendingTransaction::set_loanable`）にあり、ここには置かない。
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 書籍を登録する
    async fn create(&self, book: Book) -> Result<()>;

    /// IDで書籍を取得する
    async fn get_by_id(&self, book_id: BookId) -> Result<Option<Book>>;

    /// カタログ一覧を取得する
    ///
    /// 登録者の表示名と、閲覧者がお気に入りに入れているかどうかを
    /// 読み取り時に結合して返す。登録順。
    async fn list(&self, viewer_id: UserId, request: PageRequest) -> Result<Page<CatalogEntry>>;

    /// 表示項目（タイトル・画像URL）を更新する
    ///
    /// `loanable`は変更しない。存在しない場合は`None`。
    async fn update_details(&self, book_id: BookId, details: &BookDetails) -> Result<Option<Book>>;

    /// 貸出中でなければ削除する
    ///
    /// 判定と削除は1文で行い、同時に走る貸出と競合しない。
    async fn delete_if_loanable(&self, book_id: BookId) -> Result<DeleteBookOutcome>;
}
