use thiserror::Error;

use crate::application::ErrorKind;
use crate::ports::StoreError;

/// お気に入りのエラー
#[derive(Debug, Error)]
pub enum WishlistError {
    /// 書籍が存在しない
    #[error("Book not found")]
    BookNotFound,

    /// お気に入りに入っていない
    #[error("Wishlist entry not found")]
    EntryNotFound,

    /// 既にお気に入りに入っている
    #[error("Book is already in the wishlist")]
    AlreadyWishlisted,

    /// ストアのエラー
    #[error("Store error")]
    StoreError(#[source] StoreError),
}

impl WishlistError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WishlistError::BookNotFound | WishlistError::EntryNotFound => ErrorKind::NotFound,
            WishlistError::AlreadyWishlisted => ErrorKind::Conflict,
            WishlistError::StoreError(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, WishlistError>;
