use crate::application::ServiceDependencies;
use crate::domain::*;
use crate::ports::StoreError;

use super::errors::{Result, WishlistError};

/// お気に入りに追加する
///
/// 書籍の貸出状態は問わない。貸出中の書籍も追加できる。
/// 追加したお気に入りを書籍の表示項目と一緒に返す。
#[tracing::instrument(skip(deps))]
pub async fn add_to_wishlist(
    deps: &ServiceDependencies,
    user_id: UserId,
    book_id: BookId,
) -> Result<WishlistedBook> {
    let book = deps
        .catalog_store
        .get_by_id(book_id)
        .await
        .map_err(WishlistError::StoreError)?
        .ok_or(WishlistError::BookNotFound)?;

    let entry = WishlistEntry {
        user_id,
        book_id,
        created_at: chrono::Utc::now(),
    };

    // 確認と追加の間に削除・重複追加された場合は制約違反として返ってくる
    deps.wishlist_store.add(entry.clone()).await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => WishlistError::AlreadyWishlisted,
        StoreError::ForeignKeyViolation(_) => WishlistError::BookNotFound,
        other => WishlistError::StoreError(other),
    })?;

    Ok(WishlistedBook {
        entry,
        book: book.display(),
    })
}

/// お気に入りから削除する
#[tracing::instrument(skip(deps))]
pub async fn remove_from_wishlist(
    deps: &ServiceDependencies,
    user_id: UserId,
    book_id: BookId,
) -> Result<()> {
    let removed = deps
        .wishlist_store
        .remove(user_id, book_id)
        .await
        .map_err(WishlistError::StoreError)?;

    if !removed {
        return Err(WishlistError::EntryNotFound);
    }

    Ok(())
}

/// 利用者のお気に入りを取得する
#[tracing::instrument(skip(deps))]
pub async fn list_wishlist(
    deps: &ServiceDependencies,
    user_id: UserId,
    request: PageRequest,
) -> Result<Page<BookDisplay>> {
    deps.wishlist_store
        .list_by_user(user_id, request)
        .await
        .map_err(WishlistError::StoreError)
}
