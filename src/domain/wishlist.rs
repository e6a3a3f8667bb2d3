use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookDisplay, BookId, UserId};

/// お気に入り（借りたい本リスト）の1件
///
/// (user_id, book_id)の組で一意。貸出状態とは独立している。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub user_id: UserId,
    pub book_id: BookId,
    pub created_at: DateTime<Utc>,
}

/// 追加されたお気に入りと書籍の表示項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistedBook {
    pub entry: WishlistEntry,
    pub book: BookDisplay,
}
