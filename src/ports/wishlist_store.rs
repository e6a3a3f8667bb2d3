use crate::domain::{BookDisplay, BookId, Page, PageRequest, UserId, WishlistEntry};
use async_trait::async_trait;

use super::errors::Result;

/// お気に入りストアポート
///
/// 貸出状態とは無関係。カタログのトランザクションにも参加しない。
#[async_trait]
pub trait WishlistStore: Send + Sync {
    /// 追加する
    ///
    /// 同じ組が既にある場合は`StoreError::UniqueViolation`、
    /// 書籍が存在しない場合は`StoreError::ForeignKeyViolation`。
    async fn add(&self, entry: WishlistEntry) -> Result<()>;

    /// 削除し、削除したかどうかを返す
    async fn remove(&self, user_id: UserId, book_id: BookId) -> Result<bool>;

    /// 利用者のお気に入りを新しい順に取得する
    async fn list_by_user(&self, user_id: UserId, request: PageRequest)
    -> Result<Page<BookDisplay>>;
}
